pub mod tree_validator;

use std::fmt;

use serde::Serialize;

use crate::{Node, NodeKind, Span};

pub use tree_validator::TreeValidator;

/// A node that matched an error production, flattened to its terminal values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticDiagnostic {
    pub kind: NodeKind,
    pub values: Vec<String>,
    pub span: Span,
}

impl SemanticDiagnostic {
    pub fn from_node(node: &Node) -> Self {
        SemanticDiagnostic {
            kind: node.kind,
            values: node.flatten_values(),
            span: node.span,
        }
    }
}

impl fmt::Display for SemanticDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.values.join(" = "))
    }
}

/// Receives validator output as it is produced.
pub trait ReportSink {
    /// Start of a new document in a batch.
    fn emit_header(&mut self, title: &str) {
        self.emit_line(&format!(">>>> {}", title));
    }
    fn emit_line(&mut self, line: &str);
    fn emit_diagnostic(&mut self, diagnostic: &SemanticDiagnostic);
    /// A rendered fatal error for a document the batch skipped past.
    fn emit_error(&mut self, rendered: &str) {
        self.emit_line(rendered);
    }
}

/// One item of a collected report, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReportEntry {
    Line(String),
    Diagnostic(SemanticDiagnostic),
}

/// Report: collects output in memory for tests or programmatic capture.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            ReportEntry::Line(line) => Some(line.as_str()),
            ReportEntry::Diagnostic(_) => None,
        })
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &SemanticDiagnostic> {
        self.entries.iter().filter_map(|entry| match entry {
            ReportEntry::Diagnostic(diagnostic) => Some(diagnostic),
            ReportEntry::Line(_) => None,
        })
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics().next().is_none()
    }
}

impl ReportSink for Report {
    fn emit_line(&mut self, line: &str) {
        self.entries.push(ReportEntry::Line(line.to_string()));
    }

    fn emit_diagnostic(&mut self, diagnostic: &SemanticDiagnostic) {
        self.entries.push(ReportEntry::Diagnostic(diagnostic.clone()));
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match entry {
                ReportEntry::Line(line) => writeln!(f, "{}", line)?,
                ReportEntry::Diagnostic(diagnostic) => writeln!(f, "{}", diagnostic)?,
            }
        }
        Ok(())
    }
}

/// Walks a parsed document and returns everything the validator emitted.
///
/// # Example
/// ```rust
/// use statelint::diagnostics::to_error_source;
/// use statelint::syntax::parser::parse;
/// use statelint::validation::validate;
///
/// let tree = parse(&to_error_source("doc.txt", "id = \"99\"")).unwrap();
/// let report = validate(&tree);
/// let first = report.diagnostics().next().unwrap();
/// assert_eq!(first.to_string(), "ERR_wrong_value_type: id = 99");
/// ```
pub fn validate(root: &Node) -> Report {
    let mut report = Report::new();
    TreeValidator::new(&mut report).validate(root);
    report
}
