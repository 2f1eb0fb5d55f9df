//! Per-group score columns feeding the t-tests and the ANOVA.
//!
//! Each column row-aligns with Survey Data: row `i` shows the score of
//! response `i` when it belongs to the group, and an empty string
//! otherwise. `COUNTIF(range,">0")`, `AVERAGE` and `VAR` skip the empty
//! strings, so the same ranges serve every downstream statistic.

use surveybook_core::{
    AgeCategory, Attitude, Category, DataColumn, Gender, MaritalStatus, Personality, ReportError,
    ResponseRecord,
};

use super::BuildContext;
use crate::canvas::SheetCanvas;
use crate::formula::{cached_number, col_to_letter, text_literal};
use crate::layout::SheetKind;
use rust_xlsxwriter::Formula;

pub(crate) const Q2_MARRIED: &str = "q2_married";
pub(crate) const Q2_UNMARRIED: &str = "q2_unmarried";
pub(crate) const TRENDSETTER_18_34: &str = "trendsetter_18_34";
pub(crate) const TRENDSETTER_35_65: &str = "trendsetter_35_65";
pub(crate) const TRENDSETTER_65_PLUS: &str = "trendsetter_65_plus";
pub(crate) const Q5_FEMALE: &str = "q5_female";
pub(crate) const Q4_FEMALE: &str = "q4_female";

const BLOCK_GAP: u32 = 3;

/// Group membership a helper column filters on
#[derive(Clone, Copy, Debug)]
enum Condition {
    Gender(Gender),
    MaritalStatus(MaritalStatus),
    Age(AgeCategory),
}

impl Condition {
    fn column(self) -> DataColumn {
        match self {
            Condition::Gender(_) => DataColumn::Gender,
            Condition::MaritalStatus(_) => DataColumn::MaritalStatus,
            Condition::Age(_) => DataColumn::AgeCategory,
        }
    }

    fn target(self) -> &'static str {
        match self {
            Condition::Gender(g) => g.as_str(),
            Condition::MaritalStatus(m) => m.as_str(),
            Condition::Age(a) => a.as_str(),
        }
    }

    fn matches(self, record: &ResponseRecord) -> bool {
        let d = record.demographics();
        match self {
            Condition::Gender(g) => d.gender == g,
            Condition::MaritalStatus(m) => d.marital_status == m,
            Condition::Age(a) => d.age_category == a,
        }
    }
}

/// Survey Data score a helper column copies
#[derive(Clone, Copy, Debug)]
enum Score {
    Attitude(Attitude),
    Personality(Personality),
}

impl Score {
    fn column(self) -> DataColumn {
        match self {
            Score::Attitude(q) => DataColumn::Attitude(q),
            Score::Personality(p) => DataColumn::Personality(p),
        }
    }

    fn of(self, record: &ResponseRecord) -> f64 {
        match self {
            Score::Attitude(q) => f64::from(record.attitude(q).value()),
            Score::Personality(p) => f64::from(record.personality(p).value()),
        }
    }
}

struct HelperColumn {
    dataset: &'static str,
    header: &'static str,
    condition: Condition,
    value: Score,
}

struct HelperBlock {
    title: &'static str,
    columns: &'static [HelperColumn],
}

const BLOCKS: [HelperBlock; 3] = [
    HelperBlock {
        title: "QUESTION 3 - T-Test Helper Data",
        columns: &[
            HelperColumn {
                dataset: Q2_MARRIED,
                header: "Married Scores",
                condition: Condition::MaritalStatus(MaritalStatus::Married),
                value: Score::Attitude(Attitude::Q2),
            },
            HelperColumn {
                dataset: Q2_UNMARRIED,
                header: "Unmarried Scores",
                condition: Condition::MaritalStatus(MaritalStatus::Unmarried),
                value: Score::Attitude(Attitude::Q2),
            },
        ],
    },
    HelperBlock {
        title: "QUESTION 4 - ANOVA Helper Data",
        columns: &[
            HelperColumn {
                dataset: TRENDSETTER_18_34,
                header: "18 to 34",
                condition: Condition::Age(AgeCategory::Age18To34),
                value: Score::Personality(Personality::Trendsetter),
            },
            HelperColumn {
                dataset: TRENDSETTER_35_65,
                header: "35 to 65",
                condition: Condition::Age(AgeCategory::Age35To65),
                value: Score::Personality(Personality::Trendsetter),
            },
            HelperColumn {
                dataset: TRENDSETTER_65_PLUS,
                header: "65 and older",
                condition: Condition::Age(AgeCategory::Age65Plus),
                value: Score::Personality(Personality::Trendsetter),
            },
        ],
    },
    HelperBlock {
        title: "QUESTION 5 - Paired T-Test Helper Data",
        columns: &[
            HelperColumn {
                dataset: Q5_FEMALE,
                header: "Q5 (Petrol Prices)",
                condition: Condition::Gender(Gender::Female),
                value: Score::Attitude(Attitude::Q5),
            },
            HelperColumn {
                dataset: Q4_FEMALE,
                header: "Q4 (Alternatives)",
                condition: Condition::Gender(Gender::Female),
                value: Score::Attitude(Attitude::Q4),
            },
        ],
    },
];

/// Score of `record` in `column` when it belongs to the group
fn group_value(column: &HelperColumn, record: &ResponseRecord) -> Option<f64> {
    column
        .condition
        .matches(record)
        .then(|| column.value.of(record))
}

/// Scores of the group behind a helper dataset, in response order
pub(crate) fn group_scores(dataset: &str, records: &[ResponseRecord]) -> Vec<f64> {
    BLOCKS
        .iter()
        .flat_map(|b| b.columns.iter())
        .find(|c| c.dataset == dataset)
        .map(|column| {
            records
                .iter()
                .filter_map(|r| group_value(column, r))
                .collect()
        })
        .unwrap_or_default()
}

pub(super) fn build(ctx: &mut BuildContext<'_>) -> Result<SheetCanvas, ReportError> {
    let mut canvas = SheetCanvas::new(SheetKind::HelperData)?;
    let f = ctx.formats;
    let span = ctx.registry.basis().span();

    canvas.merge(0, 0, 0, 3, "Helper Data for Statistical Tests", &f.banner)?;

    let mut row = 2;
    for block in &BLOCKS {
        canvas.merge(row, 0, row, 3, block.title, &f.section_fill)?;
        let header_row = row + 1;
        let first_row = header_row + 1;

        for (col, column) in (0u16..).zip(block.columns) {
            canvas.string_with(header_row, col, column.header, &f.table_header)?;

            let condition = ctx
                .registry
                .descriptor(&column.condition.column().dataset())?
                .clone();
            let value = ctx.registry.descriptor(&column.value.column().dataset())?.clone();

            for offset in 0..span {
                let expr = format!(
                    "=IF({}={},{},\"\")",
                    condition.cell(offset),
                    text_literal(column.condition.target()),
                    value.cell(offset)
                );
                let cached = ctx
                    .records
                    .get(offset as usize)
                    .and_then(|r| group_value(column, r))
                    .map(cached_number)
                    .unwrap_or_default();
                canvas.formula_with(
                    first_row + offset,
                    col,
                    Formula::new(expr).set_result(cached),
                    &f.bordered,
                )?;
            }

            // Registered as soon as written; consumers resolve it by name
            ctx.registry.register_span(
                column.dataset,
                canvas.title(),
                &col_to_letter(col),
                first_row + 1,
            )?;
        }

        row = first_row + span + BLOCK_GAP;
    }

    for col in 0..3 {
        canvas.set_width(col, 20.0)?;
    }

    Ok(canvas)
}
