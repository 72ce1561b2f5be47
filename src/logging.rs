// src/logging.rs

//! Logging setup for `callgraph-hook` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the console level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `CALLGRAPH_HOOK_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Two layers are installed: a colored console layer on stderr at the chosen
//! level, and a plain-text file layer at `debug` writing a timestamped log
//! file under `log_dir`.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::cli::LogLevel;

/// Initialise the global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>, log_dir: &Path) -> Result<()> {
    let level = match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var("CALLGRAPH_HOOK_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(tracing::Level::INFO),
    };

    fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory at {log_dir:?}"))?;

    let run_id = chrono::Local::now().format("%d%m%Y-%H%M");
    let log_path = log_dir.join(format!("callgraph-hook.{run_id}.log"));
    let log_file = File::create(&log_path)
        .with_context(|| format!("creating log file at {log_path:?}"))?;

    let console_layer = fmt::layer()
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::from_level(level));

    // The log file always records the full debug stream, regardless of the
    // console level.
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
