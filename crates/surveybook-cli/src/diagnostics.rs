//! Diagnostic formatting for CLI output
//!
//! - `TerminalEmitter`: rustc-style output to stderr
//! - `JsonEmitter`: machine-readable JSON output
//!
//! Both emitters honor `--strict` (warnings become errors, hints become
//! warnings) and `--quiet` (only errors are shown).
//!
//! ## Exit Code Semantics
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: no errors (warnings/hints/info allowed) |
//! | 1 | Failure: one or more errors, or a command error |
//! | 2 | Nothing to export: the store holds no responses |
//!
//! `--quiet` never changes the exit code, only what is printed.

use std::io::Write;
use std::process;

use serde::Serialize;
use surveybook_core::{Diagnostic, DiagnosticEmitter, Severity};

// ============================================================================
// Exit Code
// ============================================================================

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// No errors (warnings/hints/info allowed)
    Success = 0,
    /// One or more errors emitted
    Failure = 1,
    /// Export requested with an empty store
    NothingToExport = 2,
}

impl ExitCode {
    /// Determine exit code from error count.
    ///
    /// The count should already reflect strict-mode escalation.
    pub fn from_error_count(count: usize) -> Self {
        if count > 0 {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

// ============================================================================
// Diagnostic Config
// ============================================================================

/// Configuration for diagnostic output
#[derive(Debug, Clone, Default)]
pub struct DiagnosticConfig {
    /// Escalate severities: warnings become errors, hints become warnings
    pub strict: bool,
    /// Suppress all output except errors
    pub quiet: bool,
}

impl DiagnosticConfig {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Default::default()
        }
    }

    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Default::default()
        }
    }

    /// Escalate severity according to strict mode rules
    pub fn effective_severity(&self, severity: Severity) -> Severity {
        if self.strict {
            match severity {
                Severity::Warning => Severity::Error,
                Severity::Hint => Severity::Warning,
                s => s,
            }
        } else {
            severity
        }
    }

    pub fn should_show(&self, severity: Severity) -> bool {
        if self.quiet {
            matches!(self.effective_severity(severity), Severity::Error)
        } else {
            true
        }
    }
}

// ============================================================================
// Terminal
// ============================================================================

/// Writes rustc-style diagnostics, e.g. `warning[W001]: ...`
pub struct TerminalEmitter<W: Write> {
    writer: W,
    config: DiagnosticConfig,
    error_count: usize,
    warning_count: usize,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, config: DiagnosticConfig) -> Self {
        Self {
            writer,
            config,
            error_count: 0,
            warning_count: 0,
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_error_count(self.error_count)
    }

    fn write_diagnostic(&mut self, diagnostic: &Diagnostic) -> std::io::Result<()> {
        let severity = self.config.effective_severity(diagnostic.severity);

        // Counted even when hidden: quiet mode must not change the exit code
        match severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            _ => {}
        }

        if !self.config.should_show(diagnostic.severity) {
            return Ok(());
        }

        writeln!(
            self.writer,
            "{}[{}]: {}",
            severity.as_str(),
            diagnostic.code.as_str(),
            diagnostic.message
        )?;

        if !diagnostic.notes.is_empty() {
            writeln!(self.writer, "   |")?;
            for note in &diagnostic.notes {
                writeln!(self.writer, "   = {}", note)?;
            }
        }
        for hint in &diagnostic.hints {
            writeln!(self.writer, "   = hint: {}", hint)?;
        }
        writeln!(self.writer)?;

        Ok(())
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        // stderr may be closed
        let _ = self.write_diagnostic(&diagnostic);
    }
}

// ============================================================================
// JSON
// ============================================================================

/// Collects diagnostics for a single JSON document
pub struct JsonEmitter {
    diagnostics: Vec<JsonDiagnostic>,
    config: DiagnosticConfig,
    error_count: usize,
}

#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub code: String,
    pub severity: String,
    pub message: String,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl JsonEmitter {
    pub fn new(config: DiagnosticConfig) -> Self {
        Self {
            diagnostics: Vec::new(),
            config,
            error_count: 0,
        }
    }

    pub fn diagnostics(&self) -> &[JsonDiagnostic] {
        &self.diagnostics
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_error_count(self.error_count)
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.diagnostics).unwrap_or(serde_json::Value::Null)
    }
}

impl DiagnosticEmitter for JsonEmitter {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let severity = self.config.effective_severity(diagnostic.severity);
        if severity == Severity::Error {
            self.error_count += 1;
        }
        if !self.config.should_show(diagnostic.severity) {
            return;
        }

        self.diagnostics.push(JsonDiagnostic {
            code: diagnostic.code.as_str().to_string(),
            severity: severity.as_str().to_string(),
            message: diagnostic.message,
            notes: diagnostic.notes,
            hints: diagnostic.hints,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveybook_core::DiagnosticCode;

    fn unseen_category() -> Diagnostic {
        Diagnostic::new(
            DiagnosticCode::W001UnseenCategory,
            "Age_Category value '65 and older' does not appear in any response",
        )
        .with_note("helper columns filtered on this value will be entirely blank")
        .with_hint("statistics that compare this group will show an error value")
    }

    #[test]
    fn terminal_emitter_basic_output() {
        let mut output = Vec::new();
        let mut emitter = TerminalEmitter::new(&mut output, DiagnosticConfig::default());

        emitter.emit(unseen_category());
        assert_eq!(emitter.warning_count(), 1);
        drop(emitter);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("warning[W001]"));
        assert!(text.contains("'65 and older'"));
        assert!(text.contains("= helper columns filtered"));
        assert!(text.contains("hint: statistics that compare"));
    }

    #[test]
    fn terminal_emitter_strict_mode() {
        let mut output = Vec::new();
        let mut emitter = TerminalEmitter::new(&mut output, DiagnosticConfig::strict());

        emitter.emit(unseen_category());

        assert_eq!(emitter.error_count(), 1);
        assert_eq!(emitter.warning_count(), 0);
        assert_eq!(emitter.exit_code(), ExitCode::Failure);
        drop(emitter);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("error[W001]"));
    }

    #[test]
    fn terminal_emitter_quiet_mode() {
        let mut output = Vec::new();
        let mut emitter = TerminalEmitter::new(&mut output, DiagnosticConfig::quiet());

        emitter.emit(unseen_category());
        assert_eq!(emitter.exit_code(), ExitCode::Success);
        drop(emitter);

        assert!(output.is_empty());
    }

    #[test]
    fn quiet_strict_still_fails() {
        let config = DiagnosticConfig {
            strict: true,
            quiet: true,
        };
        let mut output = Vec::new();
        let mut emitter = TerminalEmitter::new(&mut output, config);

        emitter.emit(unseen_category());
        assert_eq!(emitter.exit_code(), ExitCode::Failure);
    }

    #[test]
    fn json_emitter_basic_output() {
        let mut emitter = JsonEmitter::new(DiagnosticConfig::default());

        emitter.emit(unseen_category());

        let diagnostics = emitter.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "W001");
        assert_eq!(diagnostics[0].severity, "warning");
        assert_eq!(emitter.to_json_value()[0]["code"], "W001");
    }

    #[test]
    fn info_diagnostic_unchanged_in_strict() {
        let mut emitter = JsonEmitter::new(DiagnosticConfig::strict());

        emitter.emit(Diagnostic::new(
            DiagnosticCode::I001ResponseSummary,
            "10 responses analyzed, 0 warnings",
        ));

        assert_eq!(emitter.diagnostics()[0].severity, "info");
        assert!(emitter.exit_code().is_success());
    }

    #[test]
    fn exit_code_values_are_stable() {
        assert_eq!(ExitCode::from_error_count(0), ExitCode::Success);
        assert_eq!(ExitCode::from_error_count(3), ExitCode::Failure);
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::Failure.code(), 1);
        assert_eq!(ExitCode::NothingToExport.code(), 2);
    }
}
