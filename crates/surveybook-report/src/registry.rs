//! Range registry for cross-sheet formula references.
//!
//! Sheet builders register every variable-length column they write; later
//! builders resolve those names into fully-qualified A1 ranges. Resolving a
//! name that is not registered yet means a sheet was built out of order.

use std::collections::BTreeMap;
use surveybook_core::ReportError;
use tracing::debug;

use crate::formula::quote_sheet;

/// Row-count basis shared by every range of one export
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowBasis {
    /// Number of response records in the export
    pub responses: u32,
    /// Extra rows reserved below the data for manual entry
    pub padding: u32,
}

impl RowBasis {
    pub fn new(responses: usize, padding: u32) -> Self {
        Self {
            responses: u32::try_from(responses).unwrap_or(u32::MAX),
            padding,
        }
    }

    /// Rows spanned by every registered range
    pub fn span(&self) -> u32 {
        self.responses.saturating_add(self.padding)
    }

    /// Last row (1-based, inclusive) of a range starting at `first_row`
    pub fn last_row(&self, first_row: u32) -> u32 {
        first_row.saturating_add(self.span()).saturating_sub(1)
    }
}

/// Address of one registered dataset
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetRangeDescriptor {
    pub name: String,
    pub sheet: String,
    /// Column letter, e.g. "C"
    pub column: String,
    /// First row, 1-based
    pub first_row: u32,
    /// Last row, 1-based and inclusive
    pub last_row: u32,
}

impl SheetRangeDescriptor {
    pub fn rows(&self) -> u32 {
        self.last_row - self.first_row + 1
    }

    /// Fully-qualified range, e.g. `'Helper Data'!A5:A24`
    pub fn a1(&self) -> String {
        format!(
            "{}!{col}{}:{col}{}",
            quote_sheet(&self.sheet),
            self.first_row,
            self.last_row,
            col = self.column
        )
    }

    /// Fully-qualified single cell at `offset` rows below the first row
    pub fn cell(&self, offset: u32) -> String {
        format!(
            "{}!{}{}",
            quote_sheet(&self.sheet),
            self.column,
            self.first_row + offset
        )
    }
}

/// Registry of named ranges for a single export
#[derive(Debug)]
pub struct RangeRegistry {
    basis: RowBasis,
    ranges: BTreeMap<String, SheetRangeDescriptor>,
}

impl RangeRegistry {
    pub fn new(basis: RowBasis) -> Self {
        Self {
            basis,
            ranges: BTreeMap::new(),
        }
    }

    pub fn basis(&self) -> RowBasis {
        self.basis
    }

    /// Register an explicit range; names are never overwritten
    pub fn register(
        &mut self,
        name: &str,
        sheet: &str,
        column: &str,
        first_row: u32,
        last_row: u32,
    ) -> Result<&SheetRangeDescriptor, ReportError> {
        if self.ranges.contains_key(name) {
            return Err(ReportError::DuplicateRange(name.to_string()));
        }
        debug!(name, sheet, column, first_row, last_row, "range registered");
        let descriptor = SheetRangeDescriptor {
            name: name.to_string(),
            sheet: sheet.to_string(),
            column: column.to_string(),
            first_row,
            last_row,
        };
        Ok(self.ranges.entry(name.to_string()).or_insert(descriptor))
    }

    /// Register a range whose length follows the row basis
    pub fn register_span(
        &mut self,
        name: &str,
        sheet: &str,
        column: &str,
        first_row: u32,
    ) -> Result<&SheetRangeDescriptor, ReportError> {
        let last_row = self.basis.last_row(first_row);
        self.register(name, sheet, column, first_row, last_row)
    }

    pub fn descriptor(&self, name: &str) -> Result<&SheetRangeDescriptor, ReportError> {
        self.ranges
            .get(name)
            .ok_or_else(|| ReportError::UnregisteredRange(name.to_string()))
    }

    /// Fully-qualified A1 range for `name`
    pub fn resolve(&self, name: &str) -> Result<String, ReportError> {
        self.descriptor(name).map(SheetRangeDescriptor::a1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SheetRangeDescriptor> {
        self.ranges.values()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
