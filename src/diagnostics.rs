//! Unified, `miette`-based error type for statelint.
//!
//! Every fatal condition (grammar inconsistency, unreadable documents, parse
//! failures) is a [`StateError`]. Semantic findings inside a successfully parsed
//! document are *not* errors; they are reported through
//! [`crate::validation::ReportSink`] as [`crate::validation::SemanticDiagnostic`]s.
//!
//! Errors carry an [`ErrorContext`] with the named source and the offending span so
//! that `miette::Report` can render a snippet of the document.

use std::{path::Path, sync::Arc};

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::Span;

// Type aliases for clarity and brevity
pub type SourceArc = Arc<NamedSource<String>>;

/// Type-safe error classification matching the [`StateError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// A document does not match the grammar from the entry rule.
    Parse,
    /// A document could not be read.
    Io,
    /// The document directory could not be listed.
    Discovery,
    /// The embedded grammar failed its consistency check.
    Grammar,
    /// A parse tree could not be written out.
    Serialize,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Parse => "Parse",
            ErrorType::Io => "Io",
            ErrorType::Discovery => "Discovery",
            ErrorType::Grammar => "Grammar",
            ErrorType::Serialize => "Serialize",
        }
    }

    /// Diagnostic code shown by miette, e.g. `statelint::parse`.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorType::Parse => "statelint::parse",
            ErrorType::Io => "statelint::io",
            ErrorType::Discovery => "statelint::discovery",
            ErrorType::Grammar => "statelint::grammar",
            ErrorType::Serialize => "statelint::serialize",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The source the error points into (if any).
    pub source: Option<SourceArc>,
    /// The primary span for this error (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Every fatal failure mode of a statelint run.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Parse error: {message}")]
    Parse { message: String, ctx: ErrorContext },
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: std::io::Error,
    },
    #[error("Discovery error: {message}")]
    Discovery {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: walkdir::Error,
    },
    #[error("Grammar error: {message}")]
    Grammar { message: String, ctx: ErrorContext },
    #[error("Serialization error: {message}")]
    Serialize {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: serde_json::Error,
    },
}

impl StateError {
    /// Parse failure at `span` inside `source`.
    pub fn parse(message: impl Into<String>, source: &SourceArc, span: Span) -> Self {
        StateError::Parse {
            message: message.into(),
            ctx: ErrorContext::with_source_and_span(Arc::clone(source), span),
        }
    }

    /// Failure to read the document at `path`.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        StateError::Io {
            message: format!("failed to read '{}'", path.display()),
            ctx: ErrorContext::none(),
            source,
        }
    }

    /// Failure to list the document directory `root`.
    pub fn discovery(root: &Path, source: walkdir::Error) -> Self {
        StateError::Discovery {
            message: format!("failed to list '{}'", root.display()),
            ctx: ErrorContext::none(),
            source,
        }
    }

    /// The grammar consistency check reported `errors`.
    pub fn grammar(errors: &[String]) -> Self {
        StateError::Grammar {
            message: errors.join("; "),
            ctx: ErrorContext::none()
                .with_help("fix the rule definitions in src/syntax/grammar.pest"),
        }
    }

    /// Failure to encode a tree as JSON.
    pub fn serialize(source: serde_json::Error) -> Self {
        StateError::Serialize {
            message: "failed to encode the tree as JSON".to_string(),
            ctx: ErrorContext::none(),
            source,
        }
    }

    fn get_ctx(&self) -> &ErrorContext {
        match self {
            StateError::Parse { ctx, .. } => ctx,
            StateError::Io { ctx, .. } => ctx,
            StateError::Discovery { ctx, .. } => ctx,
            StateError::Grammar { ctx, .. } => ctx,
            StateError::Serialize { ctx, .. } => ctx,
        }
    }

    fn message(&self) -> &str {
        match self {
            StateError::Parse { message, .. }
            | StateError::Io { message, .. }
            | StateError::Discovery { message, .. }
            | StateError::Grammar { message, .. }
            | StateError::Serialize { message, .. } => message,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            StateError::Parse { .. } => ErrorType::Parse,
            StateError::Io { .. } => ErrorType::Io,
            StateError::Discovery { .. } => ErrorType::Discovery,
            StateError::Grammar { .. } => ErrorType::Grammar,
            StateError::Serialize { .. } => ErrorType::Serialize,
        }
    }
}

impl Diagnostic for StateError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.error_type().code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.get_ctx().span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.message().to_string()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Wraps document text into a named source for error contexts.
pub fn to_error_source(name: impl AsRef<str>, text: impl Into<String>) -> SourceArc {
    Arc::new(NamedSource::new(name, text.into()))
}

#[cfg(test)]
mod diagnostics_tests {
    use miette::Report;

    use super::*;

    #[test]
    fn parse_error_renders_label_and_code() {
        let src = to_error_source("state.txt", "id = {");
        let err = StateError::parse("expected scope", &src, Span { start: 5, end: 6 });
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("statelint::parse"));
        assert!(output.contains("expected scope"));
        assert!(output.contains("state.txt"));
    }

    #[test]
    fn grammar_error_carries_help() {
        let err = StateError::grammar(&["rule 'a' references undefined rule 'b'".to_string()]);
        assert_eq!(err.error_type(), ErrorType::Grammar);
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("undefined rule 'b'"));
        assert!(output.contains("grammar.pest"));
    }

    #[test]
    fn io_error_keeps_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = StateError::io(Path::new("missing.txt"), cause);
        assert_eq!(err.error_type(), ErrorType::Io);
        assert!(err.to_string().contains("missing.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn serialize_error_has_its_own_code() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StateError::serialize(cause);
        assert_eq!(err.error_type(), ErrorType::Serialize);
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("statelint::serialize"));
    }
}
