//! Age Group × Innovator crosstabulation with a chi-square test.

use rust_xlsxwriter::{Format, Formula};
use surveybook_core::{
    AgeCategory, Category, DataColumn, InnovatorBucket, Personality, ReportError,
    AGREEMENT_LABELS, SCALE_MAX, SCALE_MIN,
};

use super::{cached, count_where, labeled_row, BuildContext};
use crate::canvas::SheetCanvas;
use crate::formula::{cell_ref, conclusion, text_literal, CompatFunction};
use crate::layout::SheetKind;

const LAST_COL: u16 = 4;

const REJECT: &str = "Reject H0 - There is a statistically significant association";
const RETAIN: &str = "Fail to reject H0 - No statistically significant association";

/// Placement of a written observed-frequency table (0-based rows)
pub(super) struct ObservedTable {
    pub first_row: u32,
    pub total_row: u32,
}

impl ObservedTable {
    /// A1 range of the observed counts, excluding totals
    pub fn counts(&self) -> String {
        format!(
            "{}:{}",
            cell_ref(self.first_row, 1),
            cell_ref(self.total_row - 1, 2)
        )
    }
}

/// Observed Age × Innovator counts with row and column totals.
///
/// `header_row` receives the column headings; data follows directly below.
pub(super) fn write_observed(
    canvas: &mut SheetCanvas,
    ctx: &BuildContext<'_>,
    header_row: u32,
    header_format: &Format,
    cell_format: &Format,
) -> Result<ObservedTable, ReportError> {
    let f = ctx.formats;
    let threshold = ctx.config.innovator_threshold;
    let age_range = ctx.survey_range(DataColumn::AgeCategory)?;
    let innovator_range = ctx.survey_range(DataColumn::Personality(Personality::Innovator))?;

    let headers = ["Age Group", "Low Innovator", "High Innovator", "Total"];
    for (col, header) in (0u16..).zip(headers) {
        canvas.string_with(header_row, col, header, header_format)?;
    }

    let first_row = header_row + 1;
    for (row, age) in (first_row..).zip(AgeCategory::ALL) {
        canvas.string_with(row, 0, age.as_str(), cell_format)?;
        for (col, bucket) in (1u16..).zip(InnovatorBucket::ALL) {
            let expr = format!(
                "COUNTIFS({age_range},{},{innovator_range},{})",
                text_literal(age.as_str()),
                text_literal(&bucket.criterion(threshold))
            );
            let observed = count_where(ctx.records, |r| {
                r.demographics().age_category == *age
                    && InnovatorBucket::classify(r.personality(Personality::Innovator), threshold)
                        == bucket
            });
            canvas.formula_with(row, col, cached(expr, observed), cell_format)?;
        }
        let total = count_where(ctx.records, |r| r.demographics().age_category == *age);
        let expr = format!("SUM({}:{})", cell_ref(row, 1), cell_ref(row, 2));
        canvas.formula_with(row, 3, cached(expr, total), cell_format)?;
    }

    let total_row = first_row + AgeCategory::ALL.len() as u32;
    canvas.string_with(total_row, 0, "Total", &f.total)?;
    for (col, bucket) in (1u16..).zip(InnovatorBucket::ALL) {
        let n = count_where(ctx.records, |r| {
            InnovatorBucket::classify(r.personality(Personality::Innovator), threshold) == bucket
        });
        let expr = format!(
            "SUM({}:{})",
            cell_ref(first_row, col),
            cell_ref(total_row - 1, col)
        );
        canvas.formula_with(total_row, col, cached(expr, n), &f.total)?;
    }
    let expr = format!(
        "SUM({}:{})",
        cell_ref(first_row, 3),
        cell_ref(total_row - 1, 3)
    );
    canvas.formula_with(total_row, 3, cached(expr, ctx.records.len() as f64), &f.total)?;

    Ok(ObservedTable {
        first_row,
        total_row,
    })
}

/// "Label (code)" list of the agreement labels in `codes`, clamped to the scale
fn scale_description(codes: std::ops::RangeInclusive<u8>) -> String {
    let first = (*codes.start()).max(SCALE_MIN);
    let last = (*codes.end()).min(SCALE_MAX);
    (first..=last)
        .map(|code| format!("{} ({code})", AGREEMENT_LABELS[usize::from(code) - 1]))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(super) fn build(ctx: &mut BuildContext<'_>) -> Result<SheetCanvas, ReportError> {
    let mut canvas = SheetCanvas::new(SheetKind::Crosstab)?;
    let ctx: &BuildContext<'_> = ctx;
    let f = ctx.formats;
    let threshold = ctx.config.innovator_threshold;
    let alpha = ctx.config.significance_level;

    canvas.merge(
        0,
        0,
        0,
        LAST_COL,
        "Crosstabulation: Age Group × Innovator Personality (Question 2.a)",
        &f.title,
    )?;

    canvas.string_with(2, 0, "Innovator Classification:", &f.bold)?;
    labeled_row(
        &mut canvas,
        f,
        3,
        "Low Innovator:",
        &scale_description(1..=threshold.saturating_sub(1)),
        LAST_COL,
    )?;
    labeled_row(
        &mut canvas,
        f,
        4,
        "High Innovator:",
        &scale_description(threshold..=7),
        LAST_COL,
    )?;

    let observed = write_observed(&mut canvas, ctx, 6, &f.header, &f.cell)?;

    let mut row = observed.total_row + 3;
    canvas.string_with(row, 0, "Hypothesis Testing (Question 2.b)", &f.section)?;
    let lines = [
        ("Null Hypothesis (H0):", "There is no significant association between Age Group and Innovator personality classification (Low/High)."),
        ("Alternative Hypothesis (H1):", "There is a significant association between Age Group and Innovator personality classification (Low/High)."),
        ("Statistical Test:", "Chi-Square Test of Independence"),
        ("Test Rationale:", "The Chi-Square test is appropriate because both variables (Age Group and Innovator classification) are categorical variables. This test determines if there is a statistically significant association between the two categorical variables."),
    ];
    for (label, text) in lines {
        row += 1;
        labeled_row(&mut canvas, f, row, label, text, LAST_COL)?;
    }
    row += 1;
    canvas.string_with(row, 0, "How to Conduct the Test in Excel:", &f.bold)?;
    let methods = [
        ("Method 1:", "Use Data Analysis ToolPak: Data > Data Analysis > Chi-Square Test"),
        ("Method 2:", "Use CHITEST() function with observed and expected frequencies"),
    ];
    for (label, text) in methods {
        row += 1;
        labeled_row(&mut canvas, f, row, label, text, LAST_COL)?;
    }

    row += 1;
    canvas.string_with(row, 0, "Expected Frequencies (for reference):", &f.bold)?;
    row += 1;
    let headers = [
        "Age Group",
        "Low Innovator (Expected)",
        "High Innovator (Expected)",
    ];
    for (col, header) in (0u16..).zip(headers) {
        canvas.string_with(row, col, header, &f.expected_header)?;
    }
    let expected_first = row + 1;
    for (i, age) in (0u32..).zip(AgeCategory::ALL) {
        let r = expected_first + i;
        let observed_row = observed.first_row + i;
        canvas.string_with(r, 0, age.as_str(), &f.bordered)?;
        let age_total = count_where(ctx.records, |rec| rec.demographics().age_category == *age);
        for (col, bucket) in (1u16..).zip(InnovatorBucket::ALL) {
            let bucket_total = count_where(ctx.records, |rec| {
                InnovatorBucket::classify(rec.personality(Personality::Innovator), threshold)
                    == bucket
            });
            // Row total × column total / grand total
            let expr = format!(
                "{}*{}/{}",
                cell_ref(observed_row, 3),
                cell_ref(observed.total_row, col),
                cell_ref(observed.total_row, 3)
            );
            let expected = age_total * bucket_total / ctx.records.len() as f64;
            canvas.formula_with(r, col, cached(expr, expected), &f.decimal)?;
        }
    }
    let expected_last = expected_first + AgeCategory::ALL.len() as u32 - 1;

    row = expected_last + 2;
    canvas.string_with(row, 0, "Interpretation Guide:", &f.bold)?;
    row += 1;
    labeled_row(
        &mut canvas,
        f,
        row,
        &format!("If p-value < {alpha}:"),
        "Reject H0 - There is a statistically significant association between Age Group and Innovator personality classification.",
        LAST_COL,
    )?;
    row += 1;
    labeled_row(
        &mut canvas,
        f,
        row,
        &format!("If p-value ≥ {alpha}:"),
        "Fail to reject H0 - There is no statistically significant association between Age Group and Innovator personality classification.",
        LAST_COL,
    )?;

    row += 2;
    canvas.string_with(row, 0, "Chi-Square Test Results:", &f.bold)?;
    row += 1;
    canvas.string_with(row, 0, "Degrees of Freedom:", &f.bold)?;
    let dof = format!(
        "=(ROWS({})-1)*(COLUMNS({})-1)",
        observed.counts(),
        observed.counts()
    );
    let expected_dof = (AgeCategory::ALL.len() - 1) * (InnovatorBucket::ALL.len() - 1);
    canvas.formula(row, 1, Formula::new(dof).set_result(expected_dof.to_string()))?;
    row += 1;
    canvas.string_with(row, 0, "Significance Level (α):", &f.bold)?;
    canvas.number_with(row, 1, alpha, &f.p_value)?;
    row += 1;
    let p_row = row;
    let expected_range = format!("{}:{}", cell_ref(expected_first, 1), cell_ref(expected_last, 2));
    canvas.string_with(p_row, 0, "p-value (CHITEST):", &f.bold)?;
    canvas.formula_with(
        p_row,
        1,
        Formula::new(format!(
            "={}",
            CompatFunction::ChiTest.call(&format!("{},{expected_range}", observed.counts()))
        )),
        &f.p_value,
    )?;
    row += 1;
    canvas.string_with(row, 0, "Conclusion:", &f.bold)?;
    canvas.merge(row, 1, row, LAST_COL, "", &f.conclusion)?;
    canvas.formula_with(
        row,
        1,
        Formula::new(format!(
            "={}",
            conclusion(&cell_ref(p_row, 1), alpha, REJECT, RETAIN)
        )),
        &f.conclusion,
    )?;

    canvas.set_width(0, 20.0)?;
    canvas.set_width(1, 20.0)?;
    canvas.set_width(2, 20.0)?;
    canvas.set_width(3, 15.0)?;
    canvas.set_width(4, 50.0)?;

    Ok(canvas)
}
