// src/errors.rs

//! Crate-wide error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    /// A required external binary is not on PATH. Checked before any work.
    #[error("missing dependency: {binary}{}", hint_suffix(.hint))]
    DependencyMissing {
        binary: String,
        hint: Option<&'static str>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    /// A file listed in the config's `files` does not exist. Names the first
    /// offending path; resolution stops there.
    #[error("input file does not exist: {0}")]
    MissingInput(PathBuf),

    /// A pre-existing artifact could not be renamed to its backup. Fatal
    /// before any regeneration so we never overwrite unknown prior state.
    #[error("failed to rotate artifact {from:?} -> {to:?}: {source}")]
    Rotation {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// A generation pipeline exited non-zero (or timed out).
    #[error("generating callgraph.{format} failed (exit code {code:?})")]
    Generation {
        format: String,
        code: Option<i32>,
        stderr: String,
    },

    /// `git add` exited non-zero. Logged and surfaced on the run report;
    /// never fatal on its own.
    #[error("staging artifacts failed (exit code {code:?})")]
    Staging { code: Option<i32>, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn hint_suffix(hint: &Option<&'static str>) -> String {
    match hint {
        Some(h) => format!(" ({h})"),
        None => String::new(),
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, HookError>;
