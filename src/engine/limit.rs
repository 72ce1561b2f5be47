// src/engine/limit.rs

use std::future::Future;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::errors::{HookError, Result};

/// Bounds the number of concurrently admitted units of work.
///
/// Admission is a semaphore permit held for the task's full duration; the
/// permit is released on every exit path, success or failure, so a failing
/// task can never starve the ones queued behind it.
///
/// No ordering guarantee is made about which of several queued tasks is
/// admitted first, and completion order need not match submission order.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyLimiter {
    /// Create a limiter with the given capacity. Zero is a configuration
    /// error, not a degenerate "run nothing" mode.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(HookError::Config(
                "concurrency limit must be >= 1 (got 0)".to_string(),
            ));
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run one task under the limiter, blocking (at the await point) until a
    /// slot is free.
    pub async fn admit<T>(&self, task: impl Future<Output = Result<T>>) -> Result<T> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| HookError::Other(anyhow!("concurrency limiter closed: {e}")))?;
        task.await
    }

    /// Run every task under the shared limiter and wait for all of them.
    ///
    /// Results come back in submission order. A failed task does not stop
    /// the others; callers see the full set of per-task outcomes.
    pub async fn run_all<F, T>(&self, tasks: Vec<F>) -> Vec<Result<T>>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let total = tasks.len();
        debug!(tasks = total, capacity = self.capacity, "admitting task batch");

        let mut set = JoinSet::new();
        for (idx, task) in tasks.into_iter().enumerate() {
            let semaphore = self.semaphore.clone();
            set.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => task.await,
                    Err(e) => Err(HookError::Other(anyhow!(
                        "concurrency limiter closed: {e}"
                    ))),
                };
                (idx, result)
            });
        }

        let mut slots: Vec<Option<Result<T>>> = (0..total).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, result)) => slots[idx] = Some(result),
                Err(e) => {
                    // A panicked task leaves no index behind; the slot stays
                    // empty and is reported below.
                    error!(error = %e, "admitted task aborted");
                }
            }
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(HookError::Other(anyhow!("task aborted before completion")))
                })
            })
            .collect()
    }
}
