//! Sheet builders, one module per sheet.

mod charts;
mod code_book;
mod crosstab;
mod data;
mod helper;
mod summary;
mod templates;

use rust_xlsxwriter::Formula;
use surveybook_core::{DataColumn, ReportError, ResponseRecord};
use tracing::debug;

use crate::canvas::SheetCanvas;
use crate::config::ReportConfig;
use crate::formula::cached_number;
use crate::layout::SheetKind;
use crate::registry::RangeRegistry;
use crate::styles::ReportFormats;

/// State shared by the builders of one export
pub(crate) struct BuildContext<'a> {
    pub records: &'a [ResponseRecord],
    pub config: &'a ReportConfig,
    pub formats: &'a ReportFormats,
    pub registry: &'a mut RangeRegistry,
}

impl BuildContext<'_> {
    /// Resolved range of a Survey Data column
    pub fn survey_range(&self, column: DataColumn) -> Result<String, ReportError> {
        self.registry.resolve(&column.dataset())
    }
}

pub(crate) fn build(kind: SheetKind, ctx: &mut BuildContext<'_>) -> Result<SheetCanvas, ReportError> {
    let canvas = match kind {
        SheetKind::SurveyData => data::build(ctx)?,
        SheetKind::CodeBook => code_book::build(ctx)?,
        SheetKind::HelperData => helper::build(ctx)?,
        SheetKind::AnalysisTemplates => templates::build(ctx)?,
        SheetKind::Crosstab => crosstab::build(ctx)?,
        SheetKind::StatisticalTests => stat_tests::build(ctx)?,
        SheetKind::Summary => summary::build(ctx)?,
        SheetKind::Charts => charts::build(ctx)?,
    };
    debug!(sheet = kind.title(), last_row = ?canvas.last_row(), "sheet built");
    Ok(canvas)
}

/// Formula with a cached numeric result
fn cached(expr: impl AsRef<str>, value: f64) -> Formula {
    Formula::new(format!("={}", expr.as_ref())).set_result(cached_number(value))
}

/// Formula with a cached result when one is known
fn maybe_cached(expr: impl AsRef<str>, value: Option<f64>) -> Formula {
    match value {
        Some(v) => cached(expr, v),
        None => Formula::new(format!("={}", expr.as_ref())),
    }
}

/// Bold label in column A and explanatory text merged across B..=`last_col`
fn labeled_row(
    canvas: &mut SheetCanvas,
    formats: &ReportFormats,
    row: u32,
    label: &str,
    text: &str,
    last_col: u16,
) -> Result<(), ReportError> {
    canvas.string_with(row, 0, label, &formats.bold)?;
    canvas.merge(row, 1, row, last_col, text, &formats.wrap)
}

/// Count of records satisfying `pred`, as a cached-result value
fn count_where(records: &[ResponseRecord], pred: impl Fn(&ResponseRecord) -> bool) -> f64 {
    records.iter().filter(|r| pred(r)).count() as f64
}
