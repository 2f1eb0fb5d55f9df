//! Contact footer appended to every sheet.

use rust_xlsxwriter::Url;
use surveybook_core::ReportError;

use crate::canvas::SheetCanvas;
use crate::config::FooterConfig;
use crate::styles::ReportFormats;

/// Blank rows between the last content row and the footer rule
const GAP: u32 = 3;

const RULE_COLUMNS: u16 = 6;

/// Write the footer below everything on the sheet; returns the rule row (0-based)
pub(crate) fn append(
    canvas: &mut SheetCanvas,
    footer: &FooterConfig,
    formats: &ReportFormats,
) -> Result<u32, ReportError> {
    let rule_row = canvas.last_row().map_or(GAP, |last| last + GAP);
    for col in 0..RULE_COLUMNS {
        canvas.blank(rule_row, col, &formats.footer_rule)?;
    }

    let row = rule_row + 2;
    canvas.url_with(
        row,
        0,
        Url::new(footer.survey_url.as_str())
            .set_text(format!("Survey Link: {}", footer.survey_url)),
        &formats.footer_link,
    )?;
    canvas.string_with(row, 1, &footer.credentials, &formats.footer_note)?;
    canvas.url_with(
        row,
        2,
        Url::new(footer.repository_url.as_str()).set_text(footer.repository_url.as_str()),
        &formats.footer_link,
    )?;

    canvas.ensure_min_width(0, 35.0)?;
    canvas.ensure_min_width(1, 35.0)?;
    canvas.ensure_min_width(2, 50.0)?;

    Ok(rule_row)
}
