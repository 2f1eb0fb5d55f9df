use surveybook_core::{
    AgeCategory, Attitude, Category, DataColumn, Gender, MaritalStatus, Personality, ReportError,
    ResponseRecord,
};

use super::{cached, count_where, maybe_cached, BuildContext};
use crate::canvas::SheetCanvas;
use crate::formula::{cell_ref, text_literal, CompatFunction, Describe};
use crate::layout::SheetKind;

pub(super) fn build(ctx: &mut BuildContext<'_>) -> Result<SheetCanvas, ReportError> {
    let mut canvas = SheetCanvas::new(SheetKind::Summary)?;
    let ctx: &BuildContext<'_> = ctx;
    let f = ctx.formats;

    canvas.merge(0, 0, 0, 3, "Summary Statistics", &f.title)?;
    canvas.string_with(2, 0, "Demographics", &f.subheading)?;

    let row = distribution(
        &mut canvas,
        ctx,
        3,
        "Gender Distribution",
        DataColumn::Gender,
        |r| -> Gender { r.demographics().gender },
    )?;
    let row = distribution(
        &mut canvas,
        ctx,
        row + 2,
        "Age Distribution",
        DataColumn::AgeCategory,
        |r| -> AgeCategory { r.demographics().age_category },
    )?;
    let row = distribution(
        &mut canvas,
        ctx,
        row + 2,
        "Marital Status Distribution",
        DataColumn::MaritalStatus,
        |r| -> MaritalStatus { r.demographics().marital_status },
    )?;

    let mut row = row + 2;
    canvas.string_with(row, 0, "Attitude Questions - Mean Scores", &f.subheading)?;
    row += 1;
    for (col, header) in (0u16..).zip(["Question", "Mean", "Min", "Max", "Std Dev"]) {
        canvas.string_with(row, col, header, &f.table_header)?;
    }
    for question in Attitude::ALL {
        row += 1;
        let column = DataColumn::Attitude(question);
        let scores: Vec<f64> = ctx
            .records
            .iter()
            .map(|r| f64::from(r.attitude(question).value()))
            .collect();
        score_row(&mut canvas, ctx, row, question.summary_label(), column, &scores, true)?;
    }

    row += 3;
    canvas.string_with(row, 0, "Personality Types - Mean Scores", &f.subheading)?;
    row += 1;
    for (col, header) in (0u16..).zip(["Personality Type", "Mean", "Min", "Max"]) {
        canvas.string_with(row, col, header, &f.table_header)?;
    }
    for personality in Personality::ALL {
        row += 1;
        let column = DataColumn::Personality(personality);
        let scores: Vec<f64> = ctx
            .records
            .iter()
            .map(|r| f64::from(r.personality(personality).value()))
            .collect();
        score_row(&mut canvas, ctx, row, personality.name(), column, &scores, false)?;
    }

    canvas.set_width(0, 35.0)?;
    for col in 1..=4 {
        canvas.set_width(col, 12.0)?;
    }

    Ok(canvas)
}

/// Count and percentage of each category value; returns the last row written
fn distribution<C: Category>(
    canvas: &mut SheetCanvas,
    ctx: &BuildContext<'_>,
    row: u32,
    title: &str,
    column: DataColumn,
    value_of: impl Fn(&ResponseRecord) -> C,
) -> Result<u32, ReportError> {
    let f = ctx.formats;
    let range = ctx.survey_range(column)?;
    let total = ctx.records.len() as f64;

    canvas.string_with(row, 0, title, &f.bold)?;
    let mut last = row;
    for (r, &value) in (row + 1..).zip(C::ALL) {
        let count = count_where(ctx.records, |rec| value_of(rec) == value);
        canvas.string(r, 0, value.as_str())?;
        canvas.formula(
            r,
            1,
            cached(
                format!("COUNTIF({range},{})", text_literal(value.as_str())),
                count,
            ),
        )?;
        canvas.formula_with(
            r,
            2,
            cached(
                format!("{}/COUNTA({range})*100", cell_ref(r, 1)),
                count / total * 100.0,
            ),
            &f.percent,
        )?;
        last = r;
    }
    Ok(last)
}

/// Mean, min, max and optionally standard deviation of a Survey Data column
fn score_row(
    canvas: &mut SheetCanvas,
    ctx: &BuildContext<'_>,
    row: u32,
    label: &str,
    column: DataColumn,
    scores: &[f64],
    with_stdev: bool,
) -> Result<(), ReportError> {
    let f = ctx.formats;
    let range = ctx.survey_range(column)?;
    let d = Describe::of(scores);
    let min = scores.iter().copied().reduce(f64::min);
    let max = scores.iter().copied().reduce(f64::max);

    canvas.string(row, 0, label)?;
    canvas.formula_with(row, 1, maybe_cached(format!("AVERAGE({range})"), d.mean), &f.mean)?;
    canvas.formula(row, 2, maybe_cached(format!("MIN({range})"), min))?;
    canvas.formula(row, 3, maybe_cached(format!("MAX({range})"), max))?;
    if with_stdev {
        canvas.formula_with(
            row,
            4,
            maybe_cached(
                CompatFunction::Stdev.call(&range),
                d.variance.map(f64::sqrt),
            ),
            &f.mean,
        )?;
    }
    Ok(())
}
