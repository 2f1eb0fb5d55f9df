//! Import responses from a previously exported workbook.
//!
//! Only the "Survey Data" sheet is read. The header row is looked for in
//! the first ten rows and columns are matched by header text, so extra or
//! reordered columns are tolerated. Data ends at the first blank row, which
//! keeps the footer block out of the import.

use calamine::{open_workbook, open_workbook_from_rs, Data, Range, Reader, Xlsx, XlsxError};
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;
use surveybook_core::{Attitude, DataColumn, Personality, ResponseAnswers, SubmittedResponse};
use tracing::{debug, warn};

use crate::StoreError;

/// Sheet that holds one row per response
pub const SURVEY_SHEET: &str = "Survey Data";

const HEADER_SEARCH_ROWS: usize = 10;

/// Result of reading a Survey Data sheet
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportedRows {
    /// Valid responses in sheet order
    pub answers: Vec<ResponseAnswers>,
    /// Rows rejected for a missing or invalid field
    pub skipped: usize,
}

/// Read the Survey Data sheet of an xlsx file on disk
pub fn read_survey_workbook(path: impl AsRef<Path>) -> Result<ImportedRows, StoreError> {
    let mut workbook: Xlsx<_> = open_workbook(path.as_ref())
        .map_err(|e: XlsxError| StoreError::Import(e.to_string()))?;
    read_from(&mut workbook)
}

/// Read the Survey Data sheet of an in-memory xlsx document
pub fn read_survey_sheet<RS: Read + Seek>(reader: RS) -> Result<ImportedRows, StoreError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(reader)
        .map_err(|e: XlsxError| StoreError::Import(e.to_string()))?;
    read_from(&mut workbook)
}

fn read_from<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> Result<ImportedRows, StoreError> {
    if !workbook.sheet_names().iter().any(|n| n == SURVEY_SHEET) {
        return Err(StoreError::Import(format!(
            "workbook has no '{SURVEY_SHEET}' sheet"
        )));
    }
    let range = workbook
        .worksheet_range(SURVEY_SHEET)
        .map_err(|e| StoreError::Import(e.to_string()))?;
    parse_range(&range)
}

fn parse_range(range: &Range<Data>) -> Result<ImportedRows, StoreError> {
    let rows: Vec<&[Data]> = range.rows().collect();

    let (header_index, columns) = rows
        .iter()
        .take(HEADER_SEARCH_ROWS)
        .enumerate()
        .find_map(|(i, row)| {
            let columns = header_columns(row);
            (!columns.is_empty()).then_some((i, columns))
        })
        .ok_or_else(|| StoreError::Import("could not find header row".into()))?;

    debug!(row = header_index + 1, columns = columns.len(), "header row found");

    let mut imported = ImportedRows::default();
    for row in rows.iter().skip(header_index + 1) {
        if row.iter().all(is_blank) {
            break;
        }
        match row_to_submission(row, &columns).map(|s| s.validate()) {
            Some(Ok(answers)) => imported.answers.push(answers),
            Some(Err(err)) => {
                warn!(%err, "skipping invalid row");
                imported.skipped += 1;
            }
            None => imported.skipped += 1,
        }
    }

    Ok(imported)
}

fn header_columns(row: &[Data]) -> HashMap<DataColumn, usize> {
    row.iter()
        .enumerate()
        .filter_map(|(i, cell)| match cell {
            Data::String(s) => DataColumn::from_header(s.trim()).map(|c| (c, i)),
            _ => None,
        })
        .collect()
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn row_to_submission(
    row: &[Data],
    columns: &HashMap<DataColumn, usize>,
) -> Option<SubmittedResponse> {
    let cell = |column: DataColumn| columns.get(&column).and_then(|&i| row.get(i));
    let score = |column: DataColumn| cell(column).and_then(cell_integer);
    let text = |column: DataColumn| cell(column).and_then(cell_text);
    let attitude = |q: Attitude| score(DataColumn::Attitude(q));
    let personality = |p: Personality| score(DataColumn::Personality(p));

    Some(SubmittedResponse {
        q1_worried_global_warming: attitude(Attitude::Q1)?,
        q2_global_warming_threat: attitude(Attitude::Q2)?,
        q3_british_use_too_much_petrol: attitude(Attitude::Q3)?,
        q4_look_petrol_substitutes: attitude(Attitude::Q4)?,
        q5_petrol_prices_too_high: attitude(Attitude::Q5)?,
        q6_high_prices_impact_cars: attitude(Attitude::Q6)?,
        personality_novelist: personality(Personality::Novelist)?,
        personality_innovator: personality(Personality::Innovator)?,
        personality_trendsetter: personality(Personality::Trendsetter)?,
        personality_forerunner: personality(Personality::Forerunner)?,
        personality_mainstreamer: personality(Personality::Mainstreamer)?,
        personality_classic: personality(Personality::Classic)?,
        gender: text(DataColumn::Gender)?,
        marital_status: text(DataColumn::MaritalStatus)?,
        age_category: text(DataColumn::AgeCategory)?,
    })
}

fn cell_integer(cell: &Data) -> Option<i64> {
    match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) if f.fract() == 0.0 => Some(*f as i64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
