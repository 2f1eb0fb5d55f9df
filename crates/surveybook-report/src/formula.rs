//! Formula assembly helpers.
//!
//! Functions that changed name across spreadsheet versions are emitted with
//! the legacy name first and the modern name as fallback:
//!
//! ```text
//! IFERROR(TTEST(a,b,2,2),IFERROR(T.TEST(a,b,2,2),"Error"))
//! ```

/// Quote a sheet name for use in a formula reference
pub fn quote_sheet(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

/// Convert column number to Excel letter (0 -> A, 25 -> Z, 26 -> AA)
pub fn col_to_letter(col: u16) -> String {
    let mut result = String::new();
    let mut n = u32::from(col);
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// A1 reference to a cell on the same sheet, from 0-based coordinates
pub fn cell_ref(row: u32, col: u16) -> String {
    format!("{}{}", col_to_letter(col), row + 1)
}

/// Quote a string literal for a formula
pub fn text_literal(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Spreadsheet functions with a legacy and a modern name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompatFunction {
    TTest,
    FDistRt,
    ChiTest,
    Var,
    Stdev,
}

impl CompatFunction {
    pub fn legacy(self) -> &'static str {
        match self {
            CompatFunction::TTest => "TTEST",
            CompatFunction::FDistRt => "FDIST",
            CompatFunction::ChiTest => "CHITEST",
            CompatFunction::Var => "VAR",
            CompatFunction::Stdev => "STDEV",
        }
    }

    pub fn modern(self) -> &'static str {
        match self {
            CompatFunction::TTest => "T.TEST",
            CompatFunction::FDistRt => "F.DIST.RT",
            CompatFunction::ChiTest => "CHISQ.TEST",
            CompatFunction::Var => "VAR.S",
            CompatFunction::Stdev => "STDEV.S",
        }
    }

    /// `IFERROR(LEGACY(args),IFERROR(MODERN(args),"Error"))`
    pub fn call(self, args: &str) -> String {
        format!(
            "IFERROR({}({args}),IFERROR({}({args}),\"Error\"))",
            self.legacy(),
            self.modern()
        )
    }
}

/// Test tails for TTEST
pub const TWO_TAILED: u8 = 2;

/// TTEST type for paired samples
pub const PAIRED: u8 = 1;

/// TTEST type for two samples with equal variance
pub const EQUAL_VARIANCE: u8 = 2;

/// Conclusion text driven by a p-value cell
///
/// Non-numeric p-values (the "Error" fallback) produce a neutral message
/// instead of a spurious rejection.
pub fn conclusion(p_cell: &str, alpha: f64, reject: &str, retain: &str) -> String {
    format!(
        "IF(ISNUMBER({p_cell}),IF({p_cell}<{alpha},{},{}),\"Insufficient data\")",
        text_literal(reject),
        text_literal(retain)
    )
}

/// Sample statistics used for cached formula results
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub sum: f64,
    pub mean: Option<f64>,
    /// Sample variance; needs at least two values
    pub variance: Option<f64>,
}

impl Describe {
    pub fn of(values: &[f64]) -> Self {
        let count = values.len();
        let sum: f64 = values.iter().sum();
        let mean = (count > 0).then(|| sum / count as f64);
        let variance = mean.filter(|_| count > 1).map(|m| {
            values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (count - 1) as f64
        });
        Self {
            count,
            sum,
            mean,
            variance,
        }
    }
}

/// Render a number the way a spreadsheet caches it
pub fn cached_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
