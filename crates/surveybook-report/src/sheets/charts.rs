//! Small formula-backed tables, each with a native chart beside it.

use rust_xlsxwriter::{Chart, ChartDataLabel, ChartType};
use surveybook_core::{
    AgeCategory, Attitude, Category, DataColumn, Gender, MaritalStatus, Personality, ReportError,
    ResponseRecord,
};

use super::{count_where, maybe_cached, BuildContext};
use crate::canvas::SheetCanvas;
use crate::formula::{text_literal, Describe};
use crate::layout::SheetKind;

/// Charts are anchored in column F
const CHART_COL: u16 = 5;

/// Rows from the end of one table to the title of the next
const TABLE_SPACING: u32 = 20;

/// Chart size in pixels; the height stays under `TABLE_SPACING` rows
const CHART_WIDTH: u32 = 480;
const CHART_HEIGHT: u32 = 300;
const WIDE_CHART_WIDTH: u32 = 640;

/// One chart source table
struct ChartTable {
    title: &'static str,
    headers: [&'static str; 2],
    /// (category label, formula, cached value)
    rows: Vec<(&'static str, String, Option<f64>)>,
}

impl ChartTable {
    fn counts<C: Category>(
        ctx: &BuildContext<'_>,
        title: &'static str,
        header: &'static str,
        column: DataColumn,
        values: &[C],
        value_of: impl Fn(&ResponseRecord) -> C,
    ) -> Result<Self, ReportError> {
        let range = ctx.survey_range(column)?;
        let rows = values
            .iter()
            .map(|&value| {
                (
                    value.as_str(),
                    format!("COUNTIF({range},{})", text_literal(value.as_str())),
                    Some(count_where(ctx.records, |r| value_of(r) == value)),
                )
            })
            .collect();
        Ok(Self {
            title,
            headers: [header, "Count"],
            rows,
        })
    }

    fn means(
        title: &'static str,
        header: &'static str,
        rows: Vec<(&'static str, String, Option<f64>)>,
    ) -> Self {
        Self {
            title,
            headers: [header, "Mean Score"],
            rows,
        }
    }

    /// Write the table at `row`; returns the (first, last) data rows
    fn write(
        &self,
        canvas: &mut SheetCanvas,
        ctx: &BuildContext<'_>,
        row: u32,
        mean_format: bool,
    ) -> Result<(u32, u32), ReportError> {
        let f = ctx.formats;
        canvas.string_with(row, 0, self.title, &f.subheading)?;
        canvas.string_with(row + 1, 0, self.headers[0], &f.bold)?;
        canvas.string_with(row + 1, 1, self.headers[1], &f.bold)?;

        let first = row + 2;
        for (r, (label, expr, value)) in (first..).zip(&self.rows) {
            canvas.string(r, 0, label)?;
            let formula = maybe_cached(expr, *value);
            if mean_format {
                canvas.formula_with(r, 1, formula, &f.mean)?;
            } else {
                canvas.formula(r, 1, formula)?;
            }
        }
        Ok((first, first + self.rows.len() as u32 - 1))
    }
}

fn chart(
    kind: ChartType,
    title: &str,
    sheet: &str,
    (first, last): (u32, u32),
    label: &ChartDataLabel,
) -> Chart {
    let mut chart = Chart::new(kind);
    chart
        .add_series()
        .set_categories((sheet, first, 0, last, 0))
        .set_values((sheet, first, 1, last, 1))
        .set_data_label(label);
    chart.title().set_name(title);
    chart.legend().set_hidden();
    chart
}

fn axes(chart: &mut Chart, x: &str, y: &str) {
    chart.x_axis().set_name(x);
    chart.y_axis().set_name(y);
}

fn mean_rows<T: Copy>(
    ctx: &BuildContext<'_>,
    items: &[T],
    label: impl Fn(T) -> &'static str,
    column: impl Fn(T) -> DataColumn,
    score: impl Fn(&ResponseRecord, T) -> u8,
) -> Result<Vec<(&'static str, String, Option<f64>)>, ReportError> {
    items
        .iter()
        .map(|&item| {
            let range = ctx.survey_range(column(item))?;
            let scores: Vec<f64> = ctx
                .records
                .iter()
                .map(|r| f64::from(score(r, item)))
                .collect();
            Ok((
                label(item),
                format!("AVERAGE({range})"),
                Describe::of(&scores).mean,
            ))
        })
        .collect()
}

pub(super) fn build(ctx: &mut BuildContext<'_>) -> Result<SheetCanvas, ReportError> {
    let mut canvas = SheetCanvas::new(SheetKind::Charts)?;
    let ctx: &BuildContext<'_> = ctx;
    let f = ctx.formats;
    let sheet = canvas.title();

    canvas.merge(0, 0, 0, 9, "Data Visualizations", &f.banner)?;

    let pie_label = ChartDataLabel::new()
        .show_value()
        .show_percentage()
        .show_category_name()
        .clone();
    let value_label = ChartDataLabel::new().show_value().clone();

    // Gender
    let mut row = 2;
    let table = ChartTable::counts(
        ctx,
        "Gender Distribution",
        "Gender",
        DataColumn::Gender,
        &[Gender::Female, Gender::Male],
        |r| r.demographics().gender,
    )?;
    let rows = table.write(&mut canvas, ctx, row, false)?;
    let mut pie = chart(ChartType::Pie, table.title, sheet, rows, &pie_label);
    pie.set_width(CHART_WIDTH).set_height(CHART_HEIGHT);
    canvas.chart(row, CHART_COL, &pie, CHART_HEIGHT)?;
    row = rows.1 + TABLE_SPACING;

    // Age category
    let table = ChartTable::counts(
        ctx,
        "Age Category Distribution",
        "Age Category",
        DataColumn::AgeCategory,
        AgeCategory::ALL,
        |r| r.demographics().age_category,
    )?;
    let rows = table.write(&mut canvas, ctx, row, false)?;
    let mut bar = chart(ChartType::Column, table.title, sheet, rows, &value_label);
    axes(&mut bar, "Age Category", "Count");
    bar.set_style(10)
        .set_width(CHART_WIDTH)
        .set_height(CHART_HEIGHT);
    canvas.chart(row, CHART_COL, &bar, CHART_HEIGHT)?;
    row = rows.1 + TABLE_SPACING;

    // Attitude means
    let table = ChartTable::means(
        "Attitude Questions - Mean Scores",
        "Question",
        mean_rows(
            ctx,
            &Attitude::ALL,
            Attitude::code,
            DataColumn::Attitude,
            |r, q| r.attitude(q).value(),
        )?,
    );
    let rows = table.write(&mut canvas, ctx, row, true)?;
    let mut line = chart(ChartType::Line, table.title, sheet, rows, &value_label);
    axes(&mut line, "Question", "Mean Score (1-7)");
    line.set_width(WIDE_CHART_WIDTH).set_height(CHART_HEIGHT);
    canvas.chart(row, CHART_COL, &line, CHART_HEIGHT)?;
    row = rows.1 + TABLE_SPACING;

    // Personality means
    let table = ChartTable::means(
        "Personality Types - Mean Scores",
        "Personality Type",
        mean_rows(
            ctx,
            &Personality::ALL,
            Personality::name,
            DataColumn::Personality,
            |r, p| r.personality(p).value(),
        )?,
    );
    let rows = table.write(&mut canvas, ctx, row, true)?;
    let mut columns = chart(ChartType::Column, table.title, sheet, rows, &value_label);
    axes(&mut columns, "Personality Type", "Mean Score (1-7)");
    columns
        .set_style(10)
        .set_width(WIDE_CHART_WIDTH)
        .set_height(CHART_HEIGHT);
    canvas.chart(row, CHART_COL, &columns, CHART_HEIGHT)?;
    row = rows.1 + TABLE_SPACING;

    // Marital status
    let table = ChartTable::counts(
        ctx,
        "Marital Status Distribution",
        "Status",
        DataColumn::MaritalStatus,
        MaritalStatus::ALL,
        |r| r.demographics().marital_status,
    )?;
    let rows = table.write(&mut canvas, ctx, row, false)?;
    let mut pie = chart(ChartType::Pie, table.title, sheet, rows, &pie_label);
    pie.set_width(WIDE_CHART_WIDTH).set_height(CHART_HEIGHT);
    canvas.chart(row, CHART_COL, &pie, CHART_HEIGHT)?;

    canvas.set_width(0, 30.0)?;
    canvas.set_width(1, 15.0)?;

    Ok(canvas)
}
