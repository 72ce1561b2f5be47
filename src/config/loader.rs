// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::JobConfig;
use crate::errors::{HookError, Result};

/// Load a job config from a given path and return the raw `JobConfig`.
///
/// This only performs JSON deserialization; it does **not** check that the
/// referenced directory and files exist. Use [`crate::config::resolve`] for
/// that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<JobConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        HookError::Config(format!("reading config file at {path:?}: {e}"))
    })?;

    let config: JobConfig = serde_json::from_str(&contents).map_err(|e| {
        HookError::Config(format!("parsing JSON config from {path:?}: {e}"))
    })?;

    debug!(config = ?path, "config file loaded");
    Ok(config)
}
