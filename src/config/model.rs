// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Extension of the source files the analysis tool understands. Discovery
/// applies this single fixed filter, nothing else.
pub const SOURCE_EXT: &str = "py";

/// Job description as read from a `callgraph.config.json` document.
///
/// ```json
/// {
///     "input_directory": "src/mypackage",
///     "files": ["a.py", "b.py"],
///     "output_format": "svg"
/// }
/// ```
///
/// Loaded once per invocation and owned by the orchestrator for the run's
/// duration; never mutated after deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Root directory holding the source files and the output artifacts.
    pub input_directory: PathBuf,

    /// Explicit filenames relative to `input_directory`.
    ///
    /// Empty means "discover all `.py` files directly under
    /// `input_directory`".
    #[serde(default)]
    pub files: Vec<String>,

    /// Secondary rendered format (e.g. `"svg"`, `"png"`). Empty means "skip
    /// the secondary output".
    #[serde(default)]
    pub output_format: String,
}

impl JobConfig {
    /// The secondary render format, lowercased, or `None` when not requested.
    pub fn secondary_format(&self) -> Option<String> {
        let fmt = self.output_format.trim().to_lowercase();
        if fmt.is_empty() { None } else { Some(fmt) }
    }
}

/// Ordered, immutable list of input paths to feed to the analysis tool.
///
/// Built once during resolution; discovery output is sorted so the resolved
/// order is deterministic regardless of directory-iteration order.
#[derive(Debug, Clone)]
pub struct ResolvedInputSet {
    paths: Vec<PathBuf>,
}

impl ResolvedInputSet {
    pub(crate) fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(|p| p.as_path())
    }
}
