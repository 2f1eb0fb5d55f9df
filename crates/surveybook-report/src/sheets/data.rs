use surveybook_core::{CellValue, DataColumn, ReportError};

use super::BuildContext;
use crate::canvas::SheetCanvas;
use crate::layout::SheetKind;

/// First data row (1-based); row 1 holds the headers
pub(crate) const FIRST_DATA_ROW: u32 = 2;

/// One row per response under the fixed A..P headers.
///
/// Registers every column as `data.<Header>` spanning the response rows
/// plus padding, so manual additions below the data are still counted.
pub(super) fn build(ctx: &mut BuildContext<'_>) -> Result<SheetCanvas, ReportError> {
    let mut canvas = SheetCanvas::new(SheetKind::SurveyData)?;
    let f = ctx.formats;

    for column in DataColumn::ALL {
        canvas.string_with(0, column.index(), column.header(), &f.header)?;
        canvas.set_width(column.index(), column.width())?;
    }

    for (row, record) in (FIRST_DATA_ROW - 1..).zip(ctx.records) {
        for column in DataColumn::ALL {
            match record.cell(column) {
                CellValue::Number(n) => canvas.number_with(row, column.index(), n, &f.cell)?,
                CellValue::Text(s) => canvas.string_with(row, column.index(), s, &f.cell)?,
            }
        }
    }

    canvas.freeze_header()?;

    // Padding rows stay free for manual entry; the footer goes below them
    let last_range_row = ctx.registry.basis().last_row(FIRST_DATA_ROW);
    canvas.reserve_through(last_range_row.saturating_sub(1));

    for column in DataColumn::ALL {
        ctx.registry.register_span(
            &column.dataset(),
            canvas.title(),
            &column.letter().to_string(),
            FIRST_DATA_ROW,
        )?;
    }

    Ok(canvas)
}
