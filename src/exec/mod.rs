// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs external commands on behalf of the orchestrator, using
//! `tokio::process::Command` with native multi-stage piping.
//!
//! - [`pipeline`] defines the typed command description (`CommandSpec`,
//!   `Pipeline`) that replaces shell-concatenated command strings.
//! - [`runner`] spawns the stages, propagates failure of any stage, and
//!   reports the aggregated result.

pub mod pipeline;
pub mod runner;

pub use pipeline::{CommandSpec, Pipeline};
pub use runner::{PipelineOutput, run, run_blocking};
