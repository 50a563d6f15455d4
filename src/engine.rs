use std::path::{Path, PathBuf};

use miette::Report;
use tracing::{error, info};

use crate::{
    diagnostics::{SourceArc, StateError},
    discovery::{discover_documents, read_document, DiscoveryConfig},
    syntax::parser::StateGrammar,
    validation::{semantic::TreeValidator, ReportSink},
};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Everything a batch run needs to know, gathered from the command line.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory holding the documents.
    pub dir: PathBuf,
    pub discovery: DiscoveryConfig,
    /// Report a failing document and continue instead of halting the batch.
    pub keep_going: bool,
    /// Print each document's text before its tree (on by default).
    pub echo_source: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            dir: PathBuf::from("."),
            discovery: DiscoveryConfig::default(),
            keep_going: false,
            echo_source: true,
        }
    }
}

/// Counters for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents parsed and validated.
    pub documents: usize,
    /// Semantic diagnostics across all documents.
    pub diagnostics: usize,
    /// Documents that could not be read or parsed (only non-zero with `keep_going`).
    pub failures: usize,
}

// ============================================================================
// BATCH PIPELINE
// ============================================================================

/// Read → Parse → Dump → Validate for every document, in order.
///
/// The grammar is built once and borrowed by every document.
pub struct BatchPipeline {
    grammar: StateGrammar,
    config: BatchConfig,
}

impl BatchPipeline {
    /// Builds the grammar and fails before any document is touched if it is inconsistent.
    pub fn new(config: BatchConfig) -> Result<Self, StateError> {
        Ok(Self::with_grammar(StateGrammar::new()?, config))
    }

    pub fn with_grammar(grammar: StateGrammar, config: BatchConfig) -> Self {
        BatchPipeline { grammar, config }
    }

    /// Discovers the configured directory and processes every document.
    pub fn run(&self, sink: &mut dyn ReportSink) -> Result<BatchSummary, StateError> {
        let paths = discover_documents(&self.config.dir, &self.config.discovery)?;
        self.run_batch(&paths, sink)
    }

    /// Processes `paths` in order.
    ///
    /// Halts on the first read or parse error unless `keep_going` is set, in which
    /// case the error goes to the sink and the next document is processed.
    pub fn run_batch(
        &self,
        paths: &[PathBuf],
        sink: &mut dyn ReportSink,
    ) -> Result<BatchSummary, StateError> {
        let mut summary = BatchSummary::default();

        for path in paths {
            match self.process_document(path, sink) {
                Ok(diagnostics) => {
                    summary.documents += 1;
                    summary.diagnostics += diagnostics;
                }
                Err(e) if self.config.keep_going => {
                    error!(path = %path.display(), "document failed, continuing");
                    summary.failures += 1;
                    sink.emit_error(&render_error(&e));
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            documents = summary.documents,
            diagnostics = summary.diagnostics,
            failures = summary.failures,
            "batch finished"
        );
        Ok(summary)
    }

    /// Reads, parses and validates one document. Returns its diagnostic count.
    pub fn process_document(
        &self,
        path: &Path,
        sink: &mut dyn ReportSink,
    ) -> Result<usize, StateError> {
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        sink.emit_header(&title);

        let source = read_document(path)?;
        if self.config.echo_source {
            sink.emit_line(source.inner());
        }
        self.process_source(&source, sink)
    }

    /// Parses and validates already-loaded text.
    pub fn process_source(
        &self,
        source: &SourceArc,
        sink: &mut dyn ReportSink,
    ) -> Result<usize, StateError> {
        let tree = self.grammar.parse(source)?;
        sink.emit_line(tree.dump().trim_end());
        Ok(TreeValidator::new(sink).validate(&tree))
    }
}

// ============================================================================
// ERROR OUTPUT
// ============================================================================

/// Prints a fatal error with its source snippet to stderr.
pub fn print_error(error: StateError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}

/// Renders an error the way [`print_error`] would, without consuming it.
pub fn render_error(error: &StateError) -> String {
    let mut out = String::new();
    let handler = miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut out, error).is_err() {
        return error.to_string();
    }
    out
}
