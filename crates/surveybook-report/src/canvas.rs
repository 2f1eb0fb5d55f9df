//! Worksheet wrapper that remembers what has been written.
//!
//! `rust_xlsxwriter` worksheets are write-only: they cannot report the last
//! used row or the width of a column. The footer needs both, so every write
//! goes through a `SheetCanvas`.

use rust_xlsxwriter::{Chart, Format, Formula, Url, Worksheet, XlsxError};
use std::collections::{BTreeMap, BTreeSet};
use surveybook_core::ReportError;

use crate::layout::SheetKind;

/// Approximate default row height in pixels, used to size chart footprints
const ROW_HEIGHT_PX: u32 = 20;

pub(crate) fn xlsx_err(e: XlsxError) -> ReportError {
    ReportError::Xlsx(e.to_string())
}

/// A worksheet under construction
pub struct SheetCanvas {
    kind: SheetKind,
    worksheet: Worksheet,
    last_row: Option<u32>,
    widths: BTreeMap<u16, f64>,
    hidden: BTreeSet<u16>,
}

impl SheetCanvas {
    pub fn new(kind: SheetKind) -> Result<Self, ReportError> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(kind.title()).map_err(xlsx_err)?;
        // Uncached formulas (p-values, blank helper rows) read as empty, not 0
        worksheet.set_formula_result_default("");
        Ok(Self {
            kind,
            worksheet,
            last_row: None,
            widths: BTreeMap::new(),
            hidden: BTreeSet::new(),
        })
    }

    pub fn kind(&self) -> SheetKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    /// Last populated row (0-based), if anything was written
    pub fn last_row(&self) -> Option<u32> {
        self.last_row
    }

    fn touch(&mut self, row: u32) {
        self.last_row = Some(self.last_row.map_or(row, |r| r.max(row)));
    }

    /// Treat rows up to `row` as populated without writing to them
    pub fn reserve_through(&mut self, row: u32) {
        self.touch(row);
    }

    pub fn string(&mut self, row: u32, col: u16, text: &str) -> Result<(), ReportError> {
        self.worksheet
            .write_string(row, col, text)
            .map_err(xlsx_err)?;
        self.touch(row);
        Ok(())
    }

    pub fn string_with(
        &mut self,
        row: u32,
        col: u16,
        text: &str,
        format: &Format,
    ) -> Result<(), ReportError> {
        self.worksheet
            .write_string_with_format(row, col, text, format)
            .map_err(xlsx_err)?;
        self.touch(row);
        Ok(())
    }

    pub fn number_with(
        &mut self,
        row: u32,
        col: u16,
        value: f64,
        format: &Format,
    ) -> Result<(), ReportError> {
        self.worksheet
            .write_number_with_format(row, col, value, format)
            .map_err(xlsx_err)?;
        self.touch(row);
        Ok(())
    }

    pub fn formula(&mut self, row: u32, col: u16, formula: Formula) -> Result<(), ReportError> {
        self.worksheet
            .write_formula(row, col, formula)
            .map_err(xlsx_err)?;
        self.touch(row);
        Ok(())
    }

    pub fn formula_with(
        &mut self,
        row: u32,
        col: u16,
        formula: Formula,
        format: &Format,
    ) -> Result<(), ReportError> {
        self.worksheet
            .write_formula_with_format(row, col, formula, format)
            .map_err(xlsx_err)?;
        self.touch(row);
        Ok(())
    }

    pub fn blank(&mut self, row: u32, col: u16, format: &Format) -> Result<(), ReportError> {
        self.worksheet
            .write_blank(row, col, format)
            .map_err(xlsx_err)?;
        self.touch(row);
        Ok(())
    }

    pub fn merge(
        &mut self,
        first_row: u32,
        first_col: u16,
        last_row: u32,
        last_col: u16,
        text: &str,
        format: &Format,
    ) -> Result<(), ReportError> {
        self.worksheet
            .merge_range(first_row, first_col, last_row, last_col, text, format)
            .map_err(xlsx_err)?;
        self.touch(last_row);
        Ok(())
    }

    pub fn url_with(
        &mut self,
        row: u32,
        col: u16,
        url: Url,
        format: &Format,
    ) -> Result<(), ReportError> {
        self.worksheet
            .write_url_with_format(row, col, url, format)
            .map_err(xlsx_err)?;
        self.touch(row);
        Ok(())
    }

    /// Anchor a chart at (row, col); its height counts as populated rows
    pub fn chart(
        &mut self,
        row: u32,
        col: u16,
        chart: &Chart,
        height_px: u32,
    ) -> Result<(), ReportError> {
        self.worksheet
            .insert_chart(row, col, chart)
            .map_err(xlsx_err)?;
        self.touch(row + height_px.div_ceil(ROW_HEIGHT_PX));
        Ok(())
    }

    pub fn set_width(&mut self, col: u16, width: f64) -> Result<(), ReportError> {
        self.worksheet
            .set_column_width(col, width)
            .map_err(xlsx_err)?;
        self.widths.insert(col, width);
        Ok(())
    }

    /// Widen a column to at least `min`, keeping wider settings
    pub fn ensure_min_width(&mut self, col: u16, min: f64) -> Result<(), ReportError> {
        if self.widths.get(&col).map_or(true, |w| *w < min) {
            self.set_width(col, min)?;
        }
        Ok(())
    }

    pub fn width(&self, col: u16) -> Option<f64> {
        self.widths.get(&col).copied()
    }

    pub fn hide_column(&mut self, col: u16) -> Result<(), ReportError> {
        self.worksheet.set_column_hidden(col).map_err(xlsx_err)?;
        self.hidden.insert(col);
        Ok(())
    }

    pub fn is_hidden(&self, col: u16) -> bool {
        self.hidden.contains(&col)
    }

    /// Keep the first row visible while scrolling
    pub fn freeze_header(&mut self) -> Result<(), ReportError> {
        self.worksheet.set_freeze_panes(1, 0).map_err(xlsx_err)?;
        Ok(())
    }

    pub fn into_worksheet(self) -> Worksheet {
        self.worksheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_last_row_across_writes() {
        let mut canvas = SheetCanvas::new(SheetKind::Summary).unwrap();
        assert_eq!(canvas.last_row(), None);

        canvas.string(4, 0, "a").unwrap();
        canvas.string(2, 1, "b").unwrap();
        assert_eq!(canvas.last_row(), Some(4));

        canvas
            .merge(6, 0, 7, 3, "merged", &Format::new())
            .unwrap();
        assert_eq!(canvas.last_row(), Some(7));
    }

    #[test]
    fn min_width_never_narrows() {
        let mut canvas = SheetCanvas::new(SheetKind::CodeBook).unwrap();
        canvas.set_width(1, 50.0).unwrap();
        canvas.ensure_min_width(1, 35.0).unwrap();
        canvas.ensure_min_width(2, 35.0).unwrap();

        assert_eq!(canvas.width(1), Some(50.0));
        assert_eq!(canvas.width(2), Some(35.0));
    }

    #[test]
    fn out_of_range_column_width_is_an_error() {
        let mut canvas = SheetCanvas::new(SheetKind::Summary).unwrap();
        let err = canvas.set_width(u16::MAX, 10.0).unwrap_err();
        assert!(matches!(err, ReportError::Xlsx(_)));
        assert_eq!(canvas.width(u16::MAX), None);

        assert!(canvas.hide_column(u16::MAX).is_err());
        assert!(!canvas.is_hidden(u16::MAX));
        canvas.hide_column(6).unwrap();
        assert!(canvas.is_hidden(6));
    }

    #[test]
    fn reserved_rows_count_as_populated() {
        let mut canvas = SheetCanvas::new(SheetKind::SurveyData).unwrap();
        canvas.string(0, 0, "header").unwrap();
        canvas.reserve_through(20);
        assert_eq!(canvas.last_row(), Some(20));
    }

    #[test]
    fn chart_footprint_counts_as_populated() {
        let mut canvas = SheetCanvas::new(SheetKind::Charts).unwrap();
        let mut chart = Chart::new(rust_xlsxwriter::ChartType::Pie);
        chart
            .add_series()
            .set_values(("Charts & Visualizations", 0, 1, 1, 1));
        canvas.chart(2, 5, &chart, 300).unwrap();
        assert_eq!(canvas.last_row(), Some(17));
    }
}
