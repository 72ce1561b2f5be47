// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `callgraph-hook`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "callgraph-hook",
    version,
    about = "Regenerate and stage source-code call graph artifacts from declarative configs.",
    long_about = None
)]
pub struct CliArgs {
    /// Paths to callgraph config documents (JSON). At least one is required.
    ///
    /// An empty list is rejected inside `run()` with exit code 1, not by a
    /// clap usage error.
    #[arg(value_name = "CONFIG")]
    pub configs: Vec<PathBuf>,

    /// Maximum number of configs processed concurrently in batch mode.
    #[arg(long, value_name = "N", default_value_t = 4)]
    pub jobs: usize,

    /// Per-pipeline timeout in seconds; 0 disables the bound.
    #[arg(long, value_name = "SECS", default_value_t = 600)]
    pub timeout: u64,

    /// Resolve configs and print the planned commands without executing.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CALLGRAPH_HOOK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Directory for the timestamped log file (created if absent).
    #[arg(long, value_name = "DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
