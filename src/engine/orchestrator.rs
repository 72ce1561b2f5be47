// src/engine/orchestrator.rs

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::artifact::{self, ARTIFACT_BASE, ArtifactHandle, PRIMARY_FORMAT};
use crate::config::{ResolvedInputSet, resolve};
use crate::engine::commands::{Toolchain, generation_pipeline, staging_command};
use crate::errors::{HookError, Result};
use crate::exec;

/// Options that influence how a run behaves.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub toolchain: Toolchain,
    /// Bound on each external pipeline; `None` disables the safeguard.
    pub timeout: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            toolchain: Toolchain::default(),
            timeout: Some(Duration::from_secs(600)),
        }
    }
}

/// Terminal record for one generation job.
#[derive(Debug)]
pub struct RunOutcome {
    pub format: String,
    pub code: Option<i32>,
    pub stderr: String,
    pub elapsed: Duration,
}

/// Aggregated result of one full run over a single config.
#[derive(Debug)]
pub struct RunReport {
    pub config_path: PathBuf,
    pub rotated: Vec<(PathBuf, PathBuf)>,
    pub outcomes: Vec<RunOutcome>,
    pub staged: bool,
}

/// Drives the full sequence for one config document:
///
/// resolve -> rotate -> generate primary -> generate secondary (optional)
/// -> stage
///
/// Each step's failure terminates the run; nothing is retried and nothing is
/// rolled back. A successfully generated primary artifact stays on disk even
/// when the secondary step fails afterwards.
pub struct Orchestrator {
    options: RunOptions,
}

impl Orchestrator {
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    pub async fn run(&self, config_path: &Path) -> Result<RunReport> {
        info!(config = ?config_path, "starting run");

        // Resolution failures happen before any work touches the filesystem.
        let (config, inputs) = resolve(config_path)?;

        // Rotation covers every known artifact extension before the first
        // generation job starts, so no job can overwrite a backup target
        // mid-flight.
        let rotated = artifact::rotate(&config.input_directory, ARTIFACT_BASE)?;

        let mut outcomes = Vec::new();
        let mut artifacts = Vec::new();

        // Mandatory machine-readable artifact. Failure is fatal to the whole
        // run and the secondary step is skipped entirely.
        let primary = ArtifactHandle::new(&config.input_directory, PRIMARY_FORMAT);
        outcomes.push(self.generate(&inputs, &primary).await?);
        artifacts.push(primary);

        // Optional rendered artifact.
        if let Some(format) = config.secondary_format() {
            let secondary = ArtifactHandle::new(&config.input_directory, &format);
            outcomes.push(self.generate(&inputs, &secondary).await?);
            artifacts.push(secondary);
        }

        let staged = self.stage(&artifacts).await;

        info!(
            config = ?config_path,
            artifacts = artifacts.len(),
            staged,
            "run complete"
        );

        Ok(RunReport {
            config_path: config_path.to_path_buf(),
            rotated,
            outcomes,
            staged,
        })
    }

    async fn generate(
        &self,
        inputs: &ResolvedInputSet,
        artifact: &ArtifactHandle,
    ) -> Result<RunOutcome> {
        let pipeline = generation_pipeline(&self.options.toolchain, inputs, artifact);
        info!(format = %artifact.format, cmd = %pipeline, "generating call graph");

        let started = Instant::now();
        let output = exec::run(&pipeline, self.options.timeout).await?;
        let elapsed = started.elapsed();

        if !output.success {
            error!(
                format = %artifact.format,
                exit_code = ?output.code,
                cmd = %pipeline,
                stderr = %output.stderr,
                "call graph generation failed"
            );
            return Err(HookError::Generation {
                format: artifact.format.clone(),
                code: output.code,
                stderr: output.stderr,
            });
        }

        debug!(format = %artifact.format, elapsed = ?elapsed, "generated call graph");
        Ok(RunOutcome {
            format: artifact.format.clone(),
            code: output.code,
            stderr: output.stderr,
            elapsed,
        })
    }

    /// Stage whichever artifacts were produced. Staging failure is advisory:
    /// it is logged and recorded on the report, never fatal.
    async fn stage(&self, artifacts: &[ArtifactHandle]) -> bool {
        let pipeline = staging_command(&self.options.toolchain, artifacts);
        debug!(cmd = %pipeline, "staging artifacts");

        match exec::run(&pipeline, self.options.timeout).await {
            Ok(output) if output.success => {
                info!(count = artifacts.len(), "added artifacts to the index");
                true
            }
            Ok(output) => {
                let err = HookError::Staging {
                    code: output.code,
                    stderr: output.stderr,
                };
                error!(error = %err, cmd = %pipeline, "failed to stage artifacts");
                false
            }
            Err(err) => {
                error!(error = %err, cmd = %pipeline, "failed to stage artifacts");
                false
            }
        }
    }
}
