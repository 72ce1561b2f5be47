// src/config/resolve.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::loader::load_from_path;
use crate::config::model::{JobConfig, ResolvedInputSet, SOURCE_EXT};
use crate::errors::{HookError, Result};

/// Resolve a config document into the concrete inputs for one run.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads and deserializes the JSON document.
/// - Checks that `input_directory` exists and is a directory.
/// - With an empty `files` list, discovers all `.py` files directly under
///   `input_directory` (no recursion, no globs) and sorts them.
/// - With a non-empty `files` list, joins each entry with `input_directory`
///   and fails on the first entry that is not an existing regular file.
///
/// Any failure here happens before rotation and before any external process
/// is spawned.
pub fn resolve(config_path: impl AsRef<Path>) -> Result<(JobConfig, ResolvedInputSet)> {
    let config = load_from_path(&config_path)?;

    let dir = &config.input_directory;
    if !dir.is_dir() {
        return Err(HookError::Config(format!(
            "input_directory {dir:?} does not exist or is not a directory"
        )));
    }

    let inputs = if config.files.is_empty() {
        discover_inputs(dir)?
    } else {
        check_listed_inputs(dir, &config.files)?
    };

    info!(
        config = ?config_path.as_ref(),
        inputs = inputs.len(),
        "resolved input set"
    );

    Ok((config, inputs))
}

/// Enumerate `.py` files directly under `dir`, sorted by path.
///
/// Directory-iteration order is not guaranteed by the OS; sorting keeps the
/// analyzer's input order (and thus the rendered layout) stable across runs.
fn discover_inputs(dir: &Path) -> Result<ResolvedInputSet> {
    let mut paths = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        let is_source = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXT));

        if is_source {
            debug!(file = ?path, "input set appended with discovered file");
            paths.push(path);
        }
    }

    paths.sort();
    Ok(ResolvedInputSet::new(paths))
}

/// Join each listed filename with `dir` and check existence, preserving the
/// order given in the config.
fn check_listed_inputs(dir: &Path, files: &[String]) -> Result<ResolvedInputSet> {
    let mut paths = Vec::with_capacity(files.len());

    for name in files {
        let path: PathBuf = dir.join(name);
        if !path.is_file() {
            return Err(HookError::MissingInput(path));
        }
        debug!(file = ?path, "input set appended with listed file");
        paths.push(path);
    }

    Ok(ResolvedInputSet::new(paths))
}
