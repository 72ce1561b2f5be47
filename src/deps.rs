// src/deps.rs

//! Pre-flight checks for the external toolchain.

use tracing::debug;
use which::which;

use crate::engine::Toolchain;
use crate::errors::{HookError, Result};

const ANALYZER_INSTALL_HINT: &str =
    "install with: pip install git+https://github.com/seryogin17/pyan.git";
const RENDERER_INSTALL_HINT: &str = "install graphviz";

/// Verify that every required external binary is on PATH.
///
/// Runs before resolution, so a missing tool fails the hook before any
/// artifact is touched.
pub fn check_required(toolchain: &Toolchain) -> Result<()> {
    check_binary(&toolchain.analyzer, Some(ANALYZER_INSTALL_HINT))?;
    check_binary(&toolchain.renderer, Some(RENDERER_INSTALL_HINT))?;
    check_binary(&toolchain.vcs, None)?;
    Ok(())
}

fn check_binary(binary: &str, hint: Option<&'static str>) -> Result<()> {
    match which(binary) {
        Ok(path) => {
            debug!(binary = %binary, path = ?path, "dependency found");
            Ok(())
        }
        Err(_) => Err(HookError::DependencyMissing {
            binary: binary.to_string(),
            hint,
        }),
    }
}
