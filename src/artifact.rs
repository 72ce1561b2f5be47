// src/artifact.rs

//! Output artifact naming and rotation.
//!
//! Artifacts live directly in the config's `input_directory` and are named
//! `callgraph.<format>`. Before regeneration, every pre-existing artifact is
//! renamed to a `.bak` sibling so a failing run can never silently overwrite
//! a still-valid prior artifact. There is no rollback: after a failure the
//! `.bak` files remain and the missing canonical artifact is the visible
//! failure signal.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use regex::Regex;
use tracing::{debug, info};

use crate::errors::{HookError, Result};

/// Fixed base name of every output artifact.
pub const ARTIFACT_BASE: &str = "callgraph";

/// Format of the mandatory machine-readable artifact.
pub const PRIMARY_FORMAT: &str = "json";

/// One on-disk output file: stateless metadata, the filesystem is the system
/// of record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHandle {
    pub format: String,
    pub path: PathBuf,
}

impl ArtifactHandle {
    pub fn new(dir: &Path, format: &str) -> Self {
        Self {
            format: format.to_string(),
            path: dir.join(format!("{ARTIFACT_BASE}.{format}")),
        }
    }
}

/// Rename every pre-existing `<base>.<ext>` file under `dir` to a `.bak`
/// sibling, returning the sorted `(original, backup)` pairs.
///
/// The match is anchored: literal base name, one dot, then word characters
/// only. `\w` excludes `.`, so `callgraph.json.bak` never re-matches and a
/// repeated run performs exactly one rotation per artifact. Names that merely
/// share the prefix (`callgraph_old.json`, `mycallgraph.json`) do not match
/// either.
///
/// Any rename error aborts the run with [`HookError::Rotation`] before any
/// regeneration starts.
pub fn rotate(dir: &Path, base: &str) -> Result<Vec<(PathBuf, PathBuf)>> {
    let pattern = Regex::new(&format!(r"^{}\.\w+$", regex::escape(base)))
        .context("building artifact rotation pattern")?;

    let mut rotated = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !pattern.is_match(name) {
            continue;
        }

        let backup = dir.join(format!("{name}.bak"));
        fs::rename(&path, &backup).map_err(|source| HookError::Rotation {
            from: path.clone(),
            to: backup.clone(),
            source,
        })?;

        debug!(from = ?path, to = ?backup, "rotated prior artifact");
        rotated.push((path, backup));
    }

    rotated.sort();
    if !rotated.is_empty() {
        info!(count = rotated.len(), dir = ?dir, "backed up prior artifacts");
    }

    Ok(rotated)
}
