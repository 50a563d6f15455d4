use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::diagnostics::{to_error_source, SourceArc, StateError};

/// Report file name that is never treated as a document.
pub const RESERVED_OUTPUT: &str = "output.txt";

/// Which files in a directory count as documents.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Extension documents must carry, without the dot.
    pub extension: String,
    /// Name of the report file written next to the documents; always skipped.
    pub reserved: String,
    /// Further file names to skip.
    pub exclude: Vec<String>,
    /// Descend into subdirectories.
    pub recursive: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            extension: "txt".to_string(),
            reserved: RESERVED_OUTPUT.to_string(),
            exclude: Vec::new(),
            recursive: false,
        }
    }
}

impl DiscoveryConfig {
    fn accepts(&self, path: &Path) -> bool {
        let has_extension = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension.as_str()));
        let excluded = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| {
                name == self.reserved || self.exclude.iter().any(|ex| ex == name)
            });
        has_extension && !excluded
    }
}

/// Lists the documents under `root`.
///
/// The returned list is sorted by file name so batches run in a stable order.
pub fn discover_documents<P: AsRef<Path>>(
    root: P,
    config: &DiscoveryConfig,
) -> Result<Vec<PathBuf>, StateError> {
    let root = root.as_ref();
    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if !config.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| StateError::discovery(root, e))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !config.accepts(path) {
            debug!(path = %path.display(), "skipping");
            continue;
        }
        files.push(path.to_path_buf());
    }

    info!(root = %root.display(), count = files.len(), "discovered documents");
    Ok(files)
}

/// Reads a document into a named source for parsing and diagnostics.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<SourceArc, StateError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| StateError::io(path, e))?;
    Ok(to_error_source(path.display().to_string(), text))
}
