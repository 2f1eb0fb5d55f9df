//! Diagnostics for response batches.
//!
//! Generated formulas match demographic values by exact string. A canonical
//! value that never occurs in the data produces filtered columns that are
//! entirely blank, so the analysis reports it instead of letting the report
//! silently degrade.

use serde::Serialize;
use tracing::warn;

use crate::{AgeCategory, Category, Gender, MaritalStatus, ResponseRecord};

// ============================================================================
// Severity & Codes
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Hint,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Hint => "hint",
            Severity::Info => "info",
        }
    }
}

/// Stable diagnostic codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    /// A canonical category value has no responses
    W001UnseenCategory,
    /// A category has a single response, so its variance is undefined
    W002SingleResponseGroup,
    /// Batch summary
    I001ResponseSummary,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::W001UnseenCategory => "W001",
            DiagnosticCode::W002SingleResponseGroup => "W002",
            DiagnosticCode::I001ResponseSummary => "I001",
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            DiagnosticCode::W001UnseenCategory | DiagnosticCode::W002SingleResponseGroup => {
                Severity::Warning
            }
            DiagnosticCode::I001ResponseSummary => Severity::Info,
        }
    }
}

// ============================================================================
// Diagnostic
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

/// Sink for diagnostics
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Emitter that keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct CollectingEmitter {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }
}

impl DiagnosticEmitter for CollectingEmitter {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Check category coverage of a response batch
///
/// Returns the number of warnings emitted.
pub fn analyze_responses(records: &[ResponseRecord], emitter: &mut dyn DiagnosticEmitter) -> usize {
    let mut warnings = 0;

    warnings += check_category::<Gender>(records, |r| r.demographics().gender, emitter);
    warnings += check_category::<MaritalStatus>(
        records,
        |r| r.demographics().marital_status,
        emitter,
    );
    warnings += check_category::<AgeCategory>(records, |r| r.demographics().age_category, emitter);

    emitter.emit(Diagnostic::new(
        DiagnosticCode::I001ResponseSummary,
        format!("{} responses analyzed, {} warnings", records.len(), warnings),
    ));

    warnings
}

fn check_category<C: Category>(
    records: &[ResponseRecord],
    value_of: impl Fn(&ResponseRecord) -> C,
    emitter: &mut dyn DiagnosticEmitter,
) -> usize {
    let mut warnings = 0;
    for &category in C::ALL {
        let count = records.iter().filter(|r| value_of(r) == category).count();
        match count {
            0 => {
                warn!(field = C::FIELD, value = category.as_str(), "category never observed");
                emitter.emit(
                    Diagnostic::new(
                        DiagnosticCode::W001UnseenCategory,
                        format!(
                            "{} value '{}' does not appear in any response",
                            C::FIELD,
                            category.as_str()
                        ),
                    )
                    .with_note("helper columns filtered on this value will be entirely blank")
                    .with_hint("statistics that compare this group will show an error value"),
                );
                warnings += 1;
            }
            1 => {
                emitter.emit(Diagnostic::new(
                    DiagnosticCode::W002SingleResponseGroup,
                    format!(
                        "{} value '{}' has a single response; its variance is undefined",
                        C::FIELD,
                        category.as_str()
                    ),
                ));
                warnings += 1;
            }
            _ => {}
        }
    }
    warnings
}
