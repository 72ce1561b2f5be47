// src/exec/runner.rs

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::exec::pipeline::Pipeline;

/// Terminal result of one pipeline execution.
///
/// `success` requires every stage to exit zero; `code` is the exit code of
/// the first failing stage in pipeline order (`None` if it was killed by a
/// signal or the pipeline timed out). `stdout` holds the last stage's output
/// when it was not redirected to a file; `stderr` aggregates all stages.
#[derive(Debug)]
pub struct PipelineOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Execute a pipeline, wiring each stage's stdout into the next stage's
/// stdin through native pipes.
///
/// The runner itself attaches no meaning to the commands; it spawns them,
/// waits, and reports. Files on disk or the VCS index change only as the
/// command text dictates.
///
/// With a `timeout`, expiry kills every stage and the result reports failure
/// exactly as if a stage had exited non-zero.
pub async fn run(pipeline: &Pipeline, timeout: Option<Duration>) -> Result<PipelineOutput> {
    debug!(cmd = %pipeline, "spawning pipeline");

    let mut children: Vec<(String, Child)> = Vec::new();
    let mut stderr_readers: Vec<JoinHandle<String>> = Vec::new();
    let mut prev_stdout: Option<tokio::process::ChildStdout> = None;

    let stage_count = pipeline.stages.len();
    for (idx, stage) in pipeline.stages.iter().enumerate() {
        let mut cmd = Command::new(&stage.program);
        cmd.args(&stage.args);

        match prev_stdout.take() {
            Some(out) => {
                let fd = out
                    .into_owned_fd()
                    .context("wiring pipeline stage stdin")?;
                cmd.stdin(Stdio::from(fd));
            }
            None => {
                cmd.stdin(Stdio::null());
            }
        }

        let last = idx + 1 == stage_count;
        match (&pipeline.stdout_to, last) {
            (Some(path), true) => {
                let file = std::fs::File::create(path)
                    .with_context(|| format!("creating output file {path:?}"))?;
                cmd.stdout(Stdio::from(file));
            }
            _ => {
                cmd.stdout(Stdio::piped());
            }
        }

        cmd.stderr(Stdio::piped()).kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning '{}'", stage.program))?;

        if !last {
            prev_stdout = child.stdout.take();
        }

        // Consume stderr concurrently so pipe buffers never fill; log each
        // line at debug and keep the full text for the caller.
        if let Some(stderr) = child.stderr.take() {
            let program = stage.program.clone();
            stderr_readers.push(tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                let mut buf = String::new();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(program = %program, "stderr: {}", line);
                    buf.push_str(&line);
                    buf.push('\n');
                }
                buf
            }));
        }

        children.push((stage.program.clone(), child));
    }

    // Capture the last stage's stdout when it was not redirected.
    let stdout_reader: Option<JoinHandle<String>> = children
        .last_mut()
        .and_then(|(_, child)| child.stdout.take())
        .map(|mut out| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = out.read_to_string(&mut buf).await;
                buf
            })
        });

    let statuses = match timeout {
        Some(bound) => {
            let waited = tokio::time::timeout(bound, wait_all_stages(&mut children)).await;
            match waited {
                Ok(statuses) => statuses?,
                Err(_) => {
                    warn!(cmd = %pipeline, timeout = ?bound, "pipeline timed out; killing stages");
                    for (_, child) in children.iter_mut() {
                        let _ = child.start_kill();
                    }
                    let stderr = drain_readers(stderr_readers).await;
                    if let Some(handle) = stdout_reader {
                        let _ = handle.await;
                    }
                    return Ok(PipelineOutput {
                        success: false,
                        code: None,
                        stdout: String::new(),
                        stderr: format!(
                            "pipeline timed out after {}s\n{stderr}",
                            bound.as_secs()
                        ),
                    });
                }
            }
        }
        None => wait_all_stages(&mut children).await?,
    };

    let stderr = drain_readers(stderr_readers).await;
    let stdout = match stdout_reader {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    };

    let first_failure = statuses.iter().find(|(_, status)| !status.success());
    if let Some((program, status)) = first_failure {
        debug!(
            cmd = %pipeline,
            stage = %program,
            exit_code = ?status.code(),
            "pipeline stage exited non-zero"
        );
    }

    Ok(PipelineOutput {
        success: first_failure.is_none(),
        code: match first_failure {
            Some((_, status)) => status.code(),
            None => Some(0),
        },
        stdout,
        stderr,
    })
}

/// Identical semantics to [`run`], for callers outside an async context.
///
/// Spins up a local current-thread runtime, so it must not be called from
/// within an existing Tokio runtime.
pub fn run_blocking(pipeline: &Pipeline, timeout: Option<Duration>) -> Result<PipelineOutput> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building runtime for blocking pipeline execution")?;
    rt.block_on(run(pipeline, timeout))
}

async fn wait_all_stages(
    children: &mut [(String, Child)],
) -> anyhow::Result<Vec<(String, ExitStatus)>> {
    let mut statuses = Vec::with_capacity(children.len());
    for (program, child) in children.iter_mut() {
        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for '{program}'"))?;
        statuses.push((program.clone(), status));
    }
    Ok(statuses)
}

async fn drain_readers(readers: Vec<JoinHandle<String>>) -> String {
    let mut all = String::new();
    for handle in readers {
        if let Ok(buf) = handle.await {
            all.push_str(&buf);
        }
    }
    all
}
