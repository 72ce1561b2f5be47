// src/engine/mod.rs

//! Orchestration engine for callgraph-hook.
//!
//! This module ties together:
//! - the external command templates ([`commands`])
//! - bounded-concurrency admission for batch mode ([`limit`])
//! - the per-config run sequence ([`orchestrator`])

pub mod commands;
pub mod limit;
pub mod orchestrator;

pub use commands::{Toolchain, generation_pipeline, staging_command};
pub use limit::ConcurrencyLimiter;
pub use orchestrator::{Orchestrator, RunOptions, RunOutcome, RunReport};
