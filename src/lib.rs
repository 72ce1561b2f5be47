// src/lib.rs

pub mod artifact;
pub mod cli;
pub mod config;
pub mod deps;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;

use std::path::Path;
use std::time::Duration;

use tracing::{error, info};

use crate::artifact::{ArtifactHandle, PRIMARY_FORMAT};
use crate::cli::CliArgs;
use crate::engine::{
    ConcurrencyLimiter, Orchestrator, RunOptions, Toolchain, generation_pipeline, staging_command,
};
use crate::errors::{HookError, Result};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - dependency pre-flight checks
/// - config resolution
/// - the per-config orchestrator
/// - bounded concurrency when several configs are given
///
/// With multiple configs, each one's full rotate+generate+stage sequence is
/// an independent unit of work admitted through the limiter. Configs
/// processed in the same invocation must target distinct `input_directory`
/// values; this is a precondition, not enforced at runtime.
pub async fn run(args: CliArgs) -> Result<()> {
    if args.configs.is_empty() {
        return Err(HookError::Config(
            "missing path to a callgraph config document as an argument".to_string(),
        ));
    }

    let toolchain = Toolchain::default();
    deps::check_required(&toolchain)?;

    if args.dry_run {
        for config_path in &args.configs {
            print_dry_run(config_path, &toolchain)?;
        }
        return Ok(());
    }

    let options = RunOptions {
        toolchain,
        timeout: timeout_from_secs(args.timeout),
    };

    if let [config_path] = args.configs.as_slice() {
        let report = Orchestrator::new(options).run(config_path).await?;
        info!(
            config = ?report.config_path,
            rotated = report.rotated.len(),
            artifacts = report.outcomes.len(),
            staged = report.staged,
            "processed config"
        );
        return Ok(());
    }

    run_batch(args, options).await
}

/// Process several configs through the shared limiter, reporting every
/// outcome before failing the invocation on the first recorded error.
async fn run_batch(args: CliArgs, options: RunOptions) -> Result<()> {
    let limiter = ConcurrencyLimiter::new(args.jobs)?;
    info!(
        configs = args.configs.len(),
        jobs = limiter.capacity(),
        "processing configs in batch mode"
    );

    let tasks: Vec<_> = args
        .configs
        .iter()
        .cloned()
        .map(|path| {
            let options = options.clone();
            async move { Orchestrator::new(options).run(&path).await }
        })
        .collect();

    let results = limiter.run_all(tasks).await;

    let mut first_err = None;
    for (path, result) in args.configs.iter().zip(results) {
        match result {
            Ok(report) => {
                info!(
                    config = ?path,
                    rotated = report.rotated.len(),
                    artifacts = report.outcomes.len(),
                    staged = report.staged,
                    "processed config"
                );
            }
            Err(err) => {
                error!(config = ?path, error = %err, "failed to process config");
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
    }

    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Dry-run output: resolved inputs and the commands that would run.
///
/// Resolution still happens (and can still fail), but nothing on disk is
/// rotated or regenerated.
fn print_dry_run(config_path: &Path, toolchain: &Toolchain) -> Result<()> {
    let (config, inputs) = config::resolve(config_path)?;

    println!("callgraph-hook dry-run: {}", config_path.display());
    println!("  input_directory: {}", config.input_directory.display());
    println!("  inputs ({}):", inputs.len());
    for path in inputs.iter() {
        println!("    - {}", path.display());
    }

    let primary = ArtifactHandle::new(&config.input_directory, PRIMARY_FORMAT);
    println!(
        "  primary: {}",
        generation_pipeline(toolchain, &inputs, &primary)
    );

    let mut artifacts = vec![primary];
    if let Some(format) = config.secondary_format() {
        let secondary = ArtifactHandle::new(&config.input_directory, &format);
        println!(
            "  secondary: {}",
            generation_pipeline(toolchain, &inputs, &secondary)
        );
        artifacts.push(secondary);
    }

    println!("  staging: {}", staging_command(toolchain, &artifacts));
    Ok(())
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}
