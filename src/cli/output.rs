//! Handles all user-facing output for the CLI.
//!
//! Document headers, diagnostics and summaries are colourised here so the
//! library stays free of terminal concerns.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{
    engine::BatchSummary,
    validation::{GrammarCheck, ReportSink, SemanticDiagnostic},
};

// ============================================================================
// OUTPUT SINK
// ============================================================================

/// StdoutReport: prints validator output as soon as it is produced.
pub struct StdoutReport {
    stdout: StandardStream,
}

impl StdoutReport {
    pub fn new() -> Self {
        Self {
            stdout: StandardStream::stdout(ColorChoice::Auto),
        }
    }

    fn colored_line(&mut self, spec: &ColorSpec, text: &str) {
        let _ = self.stdout.set_color(spec);
        let _ = writeln!(self.stdout, "{}", text);
        let _ = self.stdout.reset();
    }
}

impl Default for StdoutReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for StdoutReport {
    fn emit_header(&mut self, title: &str) {
        let _ = writeln!(self.stdout);
        self.colored_line(
            ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true),
            &format!(">>>> {}", title),
        );
    }

    fn emit_line(&mut self, line: &str) {
        let _ = writeln!(self.stdout, "{}", line);
    }

    fn emit_diagnostic(&mut self, diagnostic: &SemanticDiagnostic) {
        self.colored_line(
            ColorSpec::new().set_fg(Some(Color::Yellow)),
            &diagnostic.to_string(),
        );
    }

    fn emit_error(&mut self, rendered: &str) {
        let _ = self.stdout.flush();
        eprintln!("{}", rendered);
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints the batch totals.
pub fn print_summary(summary: &BatchSummary) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if summary.failures > 0 {
        Color::Red
    } else if summary.diagnostics > 0 {
        Color::Yellow
    } else {
        Color::Green
    };
    let _ = writeln!(stdout);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(
        stdout,
        "{} documents checked, {} diagnostics, {} failed",
        summary.documents, summary.diagnostics, summary.failures
    );
    let _ = stdout.reset();
}

pub fn print_grammar_check(check: &GrammarCheck) {
    for warning in &check.warnings {
        eprintln!("warning: {}", warning);
    }
    if check.is_valid() {
        println!("Grammar check passed");
    } else {
        eprintln!("Grammar check failed:");
        for err in &check.errors {
            eprintln!("• {}", err);
        }
    }
}
