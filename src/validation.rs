pub mod grammar;
pub mod semantic;

// Re-exports for concise imports
pub use grammar::{check_grammar, GrammarCheck};
pub use semantic::{validate, Report, ReportEntry, ReportSink, SemanticDiagnostic};
