use surveybook_core::{
    AgeCategory, Attitude, Category, Gender, MaritalStatus, Personality, ReportError,
    AGREEMENT_LABELS, DESCRIPTION_LABELS,
};

use super::BuildContext;
use crate::canvas::SheetCanvas;
use crate::layout::SheetKind;

const HEADERS: [&str; 3] = ["DESCRIPTION", "STATEMENT", "RESPONSE"];
const WIDTHS: [f64; 3] = [30.0, 50.0, 12.0];
const FIRST_ENTRY_ROW: u32 = 3;

/// One line of the code book: a variable heading or one of its coded answers
struct Entry {
    description: &'static str,
    statement: &'static str,
    code: Option<u8>,
}

impl Entry {
    fn heading(description: &'static str, statement: &'static str) -> Self {
        Self {
            description,
            statement,
            code: None,
        }
    }

    fn answer(statement: &'static str, code: u8) -> Self {
        Self {
            description: "",
            statement,
            code: Some(code),
        }
    }
}

fn scale(labels: &'static [&'static str; 7]) -> impl Iterator<Item = Entry> {
    (1u8..).zip(labels.iter()).map(|(code, label)| Entry::answer(*label, code))
}

fn category<C: Category>() -> impl Iterator<Item = Entry> {
    std::iter::once(Entry::heading(C::FIELD, C::QUESTION))
        .chain(C::ALL.iter().map(|c| Entry::answer(c.as_str(), c.code())))
}

fn attitude_entries() -> Vec<Entry> {
    Attitude::ALL
        .iter()
        .flat_map(|q| {
            std::iter::once(Entry::heading(q.header(), q.statement())).chain(scale(&AGREEMENT_LABELS))
        })
        .collect()
}

fn personality_and_demographic_entries() -> Vec<Entry> {
    Personality::ALL
        .iter()
        .flat_map(|p| {
            std::iter::once(Entry::heading(p.header(), p.description()))
                .chain(scale(&DESCRIPTION_LABELS))
        })
        .chain(category::<Gender>())
        .chain(category::<MaritalStatus>())
        .chain(category::<AgeCategory>())
        .collect()
}

/// Two side-by-side DESCRIPTION / STATEMENT / RESPONSE tables
pub(super) fn build(ctx: &mut BuildContext<'_>) -> Result<SheetCanvas, ReportError> {
    let mut canvas = SheetCanvas::new(SheetKind::CodeBook)?;
    let f = ctx.formats;

    canvas.merge(0, 0, 0, 5, "CODE BOOK - Survey Data", &f.title)?;

    let halves = [
        (0u16, attitude_entries()),
        (3u16, personality_and_demographic_entries()),
    ];
    for (offset, entries) in &halves {
        for (i, header) in HEADERS.iter().enumerate() {
            let col = offset + i as u16;
            canvas.string_with(FIRST_ENTRY_ROW - 1, col, header, &f.header)?;
            canvas.set_width(col, WIDTHS[i])?;
        }
        for (row, entry) in (FIRST_ENTRY_ROW..).zip(entries) {
            canvas.string_with(row, *offset, entry.description, &f.bordered)?;
            canvas.string_with(row, offset + 1, entry.statement, &f.bordered)?;
            match entry.code {
                Some(code) => canvas.number_with(row, offset + 2, f64::from(code), &f.bordered)?,
                None => canvas.blank(row, offset + 2, &f.bordered)?,
            }
        }
    }

    Ok(canvas)
}
