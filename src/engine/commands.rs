// src/engine/commands.rs

//! Command templates for the external toolchain.
//!
//! Exactly one generation pipeline exists per requested output format: the
//! analyzer emits a graph description on stdout, the renderer consumes it
//! and the result is redirected to `<input_directory>/callgraph.<format>`.

use crate::artifact::ArtifactHandle;
use crate::config::ResolvedInputSet;
use crate::exec::{CommandSpec, Pipeline};

/// Flags passed to the analyzer on every invocation.
pub const ANALYZER_FLAGS: [&str; 4] = ["--dot", "--colored", "--no-defines", "--grouped"];

/// Rank separation handed to the renderer.
pub const RENDERER_RANKSEP: &str = "-Granksep=1.5";

/// Program names of the external collaborators.
///
/// Production uses the defaults; tests substitute stub executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub analyzer: String,
    pub renderer: String,
    pub vcs: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            analyzer: "pyan".to_string(),
            renderer: "dot".to_string(),
            vcs: "git".to_string(),
        }
    }
}

/// `analyzer <inputs...> --dot --colored --no-defines --grouped
///  | renderer -T<format> -Granksep=1.5 > <artifact path>`
pub fn generation_pipeline(
    toolchain: &Toolchain,
    inputs: &ResolvedInputSet,
    artifact: &ArtifactHandle,
) -> Pipeline {
    let analyzer = CommandSpec::new(&toolchain.analyzer)
        .args(inputs.iter().map(|p| p.to_string_lossy().into_owned()))
        .args(ANALYZER_FLAGS);

    let renderer = CommandSpec::new(&toolchain.renderer)
        .arg(format!("-T{}", artifact.format))
        .arg(RENDERER_RANKSEP);

    Pipeline::new(analyzer)
        .pipe(renderer)
        .redirect_to(&artifact.path)
}

/// `vcs add <artifact paths...>`
pub fn staging_command(toolchain: &Toolchain, artifacts: &[ArtifactHandle]) -> Pipeline {
    let add = CommandSpec::new(&toolchain.vcs).arg("add").args(
        artifacts
            .iter()
            .map(|a| a.path.to_string_lossy().into_owned()),
    );
    Pipeline::new(add)
}
