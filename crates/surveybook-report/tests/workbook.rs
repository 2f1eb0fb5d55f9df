//! Workbook-level checks, read back with calamine.

use calamine::{open_workbook_from_rs, Data, DataType, Range, Reader, Xlsx};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use surveybook_core::{
    AgeCategory, Attitude, DataColumn, Demographics, Gender, LikertScore, MaritalStatus,
    Personality, Report, ReportError, ResponseAnswers, ResponseRecord,
};
use surveybook_report::{SheetKind, SurveyReport, PRESENTATION_ORDER};

fn score(v: u8) -> LikertScore {
    LikertScore::new(v).unwrap()
}

fn record(
    id: u32,
    gender: Gender,
    marital: MaritalStatus,
    age: AgeCategory,
    q2: u8,
    innovator: u8,
) -> ResponseRecord {
    let answers = ResponseAnswers::neutral(Demographics::new(gender, marital, age))
        .attitude(Attitude::Q2, score(q2))
        .personality(Personality::Innovator, score(innovator));
    ResponseRecord::new(
        id,
        Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, id).unwrap(),
        answers,
    )
}

/// Ten responses: six Married, four Unmarried
fn ten_records() -> Vec<ResponseRecord> {
    let ages = [
        AgeCategory::Age18To34,
        AgeCategory::Age35To65,
        AgeCategory::Age65Plus,
    ];
    (1..=10)
        .map(|id| {
            let marital = if id <= 6 {
                MaritalStatus::Married
            } else {
                MaritalStatus::Unmarried
            };
            let gender = if id % 2 == 0 { Gender::Female } else { Gender::Male };
            let age = ages[(id as usize) % 3];
            record(id, gender, marital, age, (id % 7 + 1) as u8, (id % 7 + 1) as u8)
        })
        .collect()
}

fn open(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
    open_workbook_from_rs(Cursor::new(bytes)).expect("valid xlsx")
}

fn range(book: &mut Xlsx<Cursor<Vec<u8>>>, kind: SheetKind) -> Range<Data> {
    book.worksheet_range(kind.title()).expect("sheet exists")
}

fn text(range: &Range<Data>, row: u32, col: u32) -> Option<String> {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn is_blank(value: Option<&Data>) -> bool {
    match value {
        None | Some(Data::Empty) => true,
        Some(Data::String(s)) => s.is_empty(),
        _ => false,
    }
}

/// First row whose column A reads `label`
fn row_of(range: &Range<Data>, label: &str) -> u32 {
    (0..range.end().map_or(0, |(r, _)| r + 1))
        .find(|r| text(range, *r, 0).as_deref() == Some(label))
        .unwrap_or_else(|| panic!("no row labeled {label}"))
}

#[test]
fn sheets_appear_in_presentation_order() {
    let bytes = SurveyReport::new().render(&ten_records()).unwrap();
    let book = open(bytes);

    let expected: Vec<String> = PRESENTATION_ORDER
        .iter()
        .map(|k| k.title().to_string())
        .collect();
    assert_eq!(book.sheet_names(), expected);
    assert_eq!(book.sheet_names().last().map(String::as_str), Some("Helper Data"));
}

#[test]
fn survey_data_headers_are_fixed() {
    let bytes = SurveyReport::new().render(&ten_records()).unwrap();
    let mut book = open(bytes);
    let data = range(&mut book, SheetKind::SurveyData);

    for column in DataColumn::ALL {
        assert_eq!(
            text(&data, 0, u32::from(column.index())).as_deref(),
            Some(column.header())
        );
    }
    assert_eq!(text(&data, 0, 15).as_deref(), Some("Age_Category"));
    assert_eq!(data.get_value((1, 0)).and_then(|v| v.as_f64()), Some(1.0));
    assert_eq!(text(&data, 10, 14).as_deref(), Some("Unmarried"));
}

#[test]
fn helper_columns_split_by_marital_status() {
    let bytes = SurveyReport::new().render(&ten_records()).unwrap();
    let mut book = open(bytes);
    let helper = range(&mut book, SheetKind::HelperData);

    let header = (0..40)
        .find(|r| text(&helper, *r, 0).as_deref() == Some("Married Scores"))
        .expect("q2 header");
    assert_eq!(text(&helper, header, 1).as_deref(), Some("Unmarried Scores"));

    let span = 10 + 10;
    let filled = |col: u32| {
        (header + 1..=header + span)
            .filter(|r| !is_blank(helper.get_value((*r, col))))
            .count()
    };
    assert_eq!(filled(0), 6);
    assert_eq!(filled(1), 4);
}

#[test]
fn helper_ranges_span_responses_plus_padding() {
    let bytes = SurveyReport::new().render(&ten_records()).unwrap();
    let mut book = open(bytes);
    let formulas = book
        .worksheet_formula(SheetKind::StatisticalTests.title())
        .unwrap();
    let values = range(&mut book, SheetKind::StatisticalTests);

    let married = row_of(&values, "Married");
    let count = formulas
        .get_value((married, 1))
        .cloned()
        .unwrap_or_default();
    // Header on row 4, data rows 5..=24 for 10 responses and 10 padding rows
    assert_eq!(count, "COUNTIF('Helper Data'!A5:A24,\">0\")");
}

#[test]
fn statistical_tests_cache_group_counts() {
    let bytes = SurveyReport::new().render(&ten_records()).unwrap();
    let mut book = open(bytes);
    let tests = range(&mut book, SheetKind::StatisticalTests);

    let married = row_of(&tests, "Married");
    let unmarried = row_of(&tests, "Unmarried");
    assert_eq!(tests.get_value((married, 1)).and_then(|v| v.as_f64()), Some(6.0));
    assert_eq!(tests.get_value((unmarried, 1)).and_then(|v| v.as_f64()), Some(4.0));
}

/// Formula text at (row, col), without the leading "="
fn formula_at(formulas: &Range<String>, row: u32, col: u32) -> String {
    formulas.get_value((row, col)).cloned().unwrap_or_default()
}

#[test]
fn anova_is_computed_in_working_columns() {
    let bytes = SurveyReport::new().render(&ten_records()).unwrap();
    let mut book = open(bytes);
    let formulas = book
        .worksheet_formula(SheetKind::StatisticalTests.title())
        .unwrap();
    let values = range(&mut book, SheetKind::StatisticalTests);

    let band = row_of(&values, "ANOVA Results");
    // 1-based rows of n, mean, variance and the three derived rows
    let (n, mean, var) = (band + 2, band + 3, band + 4);
    let (totals, sums, squares) = (band + 5, band + 6, band + 7);

    let g_n = formula_at(&formulas, n - 1, 6);
    assert!(g_n.starts_with("COUNTIF('Helper Data'!A"), "{g_n}");
    assert!(formula_at(&formulas, mean - 1, 7).starts_with("AVERAGE('Helper Data'!B"));
    assert!(formula_at(&formulas, var - 1, 8).starts_with("IFERROR(VAR('Helper Data'!C"));

    let expected = [
        (totals, 6, format!("G{n}*G{mean}+H{n}*H{mean}+I{n}*I{mean}")),
        (totals, 7, format!("G{n}+H{n}+I{n}")),
        (totals, 8, format!("G{totals}/H{totals}")),
        (
            sums,
            6,
            format!(
                "G{n}*(G{mean}-I{totals})^2+H{n}*(H{mean}-I{totals})^2+I{n}*(I{mean}-I{totals})^2"
            ),
        ),
        (sums, 7, format!("(G{n}-1)*G{var}+(H{n}-1)*H{var}+(I{n}-1)*I{var}")),
        (sums, 8, format!("H{totals}-3")),
        (squares, 6, format!("G{sums}/2")),
        (squares, 7, format!("H{sums}/I{sums}")),
        (squares, 8, format!("G{squares}/H{squares}")),
    ];
    for (row, col, formula) in expected {
        assert_eq!(formula_at(&formulas, row - 1, col), formula, "row {row} col {col}");
    }

    // Visible results in column B
    assert_eq!(formula_at(&formulas, n - 1, 1), format!("I{squares}"));
    assert_eq!(values.get_value((mean - 1, 1)).and_then(|v| v.as_f64()), Some(2.0));
    assert_eq!(formula_at(&formulas, var - 1, 1), format!("I{sums}"));
    let p_value = formula_at(&formulas, totals - 1, 1);
    assert!(
        p_value.starts_with(&format!("IFERROR(FDIST(I{squares},2,I{sums}),IFERROR(")),
        "{p_value}"
    );
    assert!(p_value.contains(&format!("F.DIST.RT(I{squares},2,I{sums})")), "{p_value}");
    assert!(p_value.ends_with(",\"Error\"))"), "{p_value}");
}

#[test]
fn t_tests_use_two_tails_and_their_own_type() {
    let bytes = SurveyReport::new().render(&ten_records()).unwrap();
    let mut book = open(bytes);
    let formulas = book
        .worksheet_formula(SheetKind::StatisticalTests.title())
        .unwrap();
    let values = range(&mut book, SheetKind::StatisticalTests);

    let independent = formula_at(&formulas, row_of(&values, "T-Test Results") + 1, 1);
    assert!(
        independent.starts_with(
            "IFERROR(TTEST('Helper Data'!A5:A24,'Helper Data'!B5:B24,2,2),IFERROR("
        ),
        "{independent}"
    );
    assert!(independent.contains("T.TEST('Helper Data'!A5:A24,'Helper Data'!B5:B24,2,2)"));

    // Helper block 3 starts below two blocks of 20 rows plus gaps
    let paired = formula_at(&formulas, row_of(&values, "Paired T-Test Results") + 1, 1);
    assert!(
        paired.starts_with(
            "IFERROR(TTEST('Helper Data'!A55:A74,'Helper Data'!B55:B74,2,1),IFERROR("
        ),
        "{paired}"
    );
    assert!(paired.contains("T.TEST('Helper Data'!A55:A74,'Helper Data'!B55:B74,2,1)"));

    let conclusion = formula_at(&formulas, row_of(&values, "Paired T-Test Results") + 3, 1);
    assert!(conclusion.contains("ISNUMBER(B"), "{conclusion}");
    assert!(conclusion.contains("<0.05"), "{conclusion}");
}

#[test]
fn crosstab_chi_square_compares_observed_and_expected() {
    let bytes = SurveyReport::new().render(&ten_records()).unwrap();
    let mut book = open(bytes);
    let formulas = book.worksheet_formula(SheetKind::Crosstab.title()).unwrap();
    let values = range(&mut book, SheetKind::Crosstab);

    // Observed counts B8:C10 with totals in row 11 and column D
    let dof = formula_at(&formulas, row_of(&values, "Degrees of Freedom:"), 1);
    assert_eq!(dof, "(ROWS(B8:C10)-1)*(COLUMNS(B8:C10)-1)");

    let expected_header = row_of(&values, "Expected Frequencies (for reference):") + 1;
    let first = expected_header + 2;
    let last = first + 2;
    assert_eq!(
        formula_at(&formulas, expected_header + 1, 1),
        "D8*B11/D11"
    );
    assert_eq!(formula_at(&formulas, last - 1, 2), "D10*C11/D11");

    let chi = formula_at(&formulas, row_of(&values, "p-value (CHITEST):"), 1);
    let args = format!("B8:C10,B{first}:C{last}");
    assert!(
        chi.starts_with(&format!("IFERROR(CHITEST({args}),IFERROR(")),
        "{chi}"
    );
    assert!(chi.contains(&format!("CHISQ.TEST({args})")), "{chi}");
}

#[test]
fn padding_widens_every_range() {
    let bytes = SurveyReport::new()
        .padding(0)
        .render(&ten_records())
        .unwrap();
    let mut book = open(bytes);
    let formulas = book.worksheet_formula(SheetKind::Summary.title()).unwrap();
    let values = range(&mut book, SheetKind::Summary);

    let male = row_of(&values, "Male");
    let count = formulas.get_value((male, 1)).cloned().unwrap_or_default();
    assert_eq!(count, "COUNTIF('Survey Data'!N2:N11,\"Male\")");
}

#[test]
fn crosstab_counts_follow_threshold() {
    let records = vec![
        record(1, Gender::Male, MaritalStatus::Married, AgeCategory::Age18To34, 4, 4),
        record(2, Gender::Male, MaritalStatus::Married, AgeCategory::Age18To34, 4, 5),
        record(3, Gender::Female, MaritalStatus::Unmarried, AgeCategory::Age18To34, 4, 7),
        record(4, Gender::Female, MaritalStatus::Unmarried, AgeCategory::Age65Plus, 4, 1),
    ];
    let bytes = SurveyReport::new().render(&records).unwrap();
    let mut book = open(bytes);
    let crosstab = range(&mut book, SheetKind::Crosstab);

    let young = row_of(&crosstab, "18 to 34");
    assert_eq!(crosstab.get_value((young, 1)).and_then(|v| v.as_f64()), Some(1.0));
    assert_eq!(crosstab.get_value((young, 2)).and_then(|v| v.as_f64()), Some(2.0));
    assert_eq!(crosstab.get_value((young, 3)).and_then(|v| v.as_f64()), Some(3.0));

    let formulas = book.worksheet_formula(SheetKind::Crosstab.title()).unwrap();
    let low = formulas.get_value((young, 1)).cloned().unwrap_or_default();
    assert!(low.contains("\"<5\""), "{low}");
    assert!(low.contains("'Survey Data'!P2:P"), "{low}");
}

#[test]
fn footer_sits_below_content_on_every_sheet() {
    let bytes = SurveyReport::new().render(&ten_records()).unwrap();
    let mut book = open(bytes);

    for kind in PRESENTATION_ORDER {
        let sheet = range(&mut book, kind);
        let end = sheet.end().map_or(0, |(r, _)| r);
        let link_row = (0..=end)
            .find(|r| {
                text(&sheet, *r, 0).is_some_and(|t| t.starts_with("Survey Link:"))
            })
            .unwrap_or_else(|| panic!("{} has no footer", kind.title()));

        let last_content = (0..link_row)
            .filter(|r| (0..16).any(|c| !is_blank(sheet.get_value((*r, c)))))
            .max()
            .unwrap_or(0);
        let rule_row = link_row - 2;
        assert!(
            rule_row >= last_content + 3,
            "{}: footer rule at {rule_row}, content ends at {last_content}",
            kind.title()
        );
    }
}

#[test]
fn survey_data_footer_clears_padding_rows() {
    let bytes = SurveyReport::new().render(&ten_records()).unwrap();
    let mut book = open(bytes);
    let data = range(&mut book, SheetKind::SurveyData);

    // Ranges cover rows 2..=21 (1-based), i.e. 0-based rows 1..=20
    let last_range_row = 20;
    for row in 11..=last_range_row {
        for col in 0..16 {
            assert!(
                is_blank(data.get_value((row, col))),
                "padding cell ({row}, {col}) is not blank"
            );
        }
    }
    let link_row = (0..=data.end().map_or(0, |(r, _)| r))
        .find(|r| text(&data, *r, 0).is_some_and(|t| t.starts_with("Survey Link:")))
        .expect("footer link");
    assert_eq!(link_row, last_range_row + 3 + 2);
}

#[test]
fn empty_input_is_reported_distinctly() {
    let err = SurveyReport::new().render(&[]).unwrap_err();
    assert!(matches!(err, ReportError::EmptyInput));
}

#[test]
fn misordered_build_names_missing_range() {
    let report = SurveyReport::new().build_order(vec![SheetKind::Summary]);
    let err = report.render(&ten_records()).unwrap_err();
    match err {
        ReportError::UnregisteredRange(name) => assert!(name.starts_with("data.")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn workbook_writes_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey_export.xlsx");
    std::fs::write(&path, SurveyReport::new().render(&ten_records()).unwrap()).unwrap();

    let book: Xlsx<_> = calamine::open_workbook(&path).unwrap();
    assert_eq!(book.sheet_names().len(), 8);
}
