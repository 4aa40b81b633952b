//! Conversion pool implementation.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

use crate::converter::{ConversionJob, Converter, ConverterError};

use super::config::PoolConfig;
use super::types::{JobOutcome, PoolStatus};

/// Error type for pool operations.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The admission semaphore was closed.
    #[error("Conversion pool is closed")]
    Closed,
}

/// Tracks statistics for the pool.
#[derive(Default)]
struct PoolStats {
    active: AtomicUsize,
    peak_active: AtomicUsize,
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl PoolStats {
    fn to_status(&self, max_concurrency: usize) -> PoolStatus {
        PoolStatus {
            max_concurrency,
            active_jobs: self.active.load(Ordering::SeqCst),
            peak_active_jobs: self.peak_active.load(Ordering::SeqCst),
            total_submitted: self.submitted.load(Ordering::Relaxed),
            total_completed: self.completed.load(Ordering::Relaxed),
            total_failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Counts a job as active for as long as it is alive.
struct ActiveGuard {
    stats: Arc<PoolStats>,
}

impl ActiveGuard {
    fn enter(stats: Arc<PoolStats>) -> Self {
        let now = stats.active.fetch_add(1, Ordering::SeqCst) + 1;
        stats.peak_active.fetch_max(now, Ordering::SeqCst);
        Self { stats }
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.stats.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runs conversions with at most `max_concurrency` in flight.
///
/// Owned by a single submitting task. Dropping the pool without calling
/// [`ConversionPool::drain`] aborts outstanding jobs.
pub struct ConversionPool<C: Converter + ?Sized> {
    converter: Arc<C>,
    max_concurrency: usize,
    admission: Arc<Semaphore>,
    stats: Arc<PoolStats>,
    jobs: JoinSet<JobOutcome>,
}

impl<C: Converter + ?Sized + 'static> ConversionPool<C> {
    /// Creates a pool. A `max_concurrency` of 0 is treated as 1.
    pub fn new(converter: Arc<C>, config: PoolConfig) -> Self {
        let max_concurrency = config.max_concurrency.max(1);

        Self {
            converter,
            max_concurrency,
            admission: Arc::new(Semaphore::new(max_concurrency)),
            stats: Arc::new(PoolStats::default()),
            jobs: JoinSet::new(),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Admission slots not currently held by a job.
    pub fn available_slots(&self) -> usize {
        self.admission.available_permits()
    }

    /// Jobs submitted but not yet collected by `try_reap` or `drain`.
    pub fn outstanding(&self) -> usize {
        self.jobs.len()
    }

    /// Returns the current pool status.
    pub fn status(&self) -> PoolStatus {
        self.stats.to_status(self.max_concurrency)
    }

    /// Submits a job, waiting until a slot is free.
    ///
    /// Returns once the job has been spawned; it does not wait for the
    /// conversion itself.
    pub async fn submit(&mut self, job: ConversionJob) -> Result<(), PoolError> {
        let permit = Arc::clone(&self.admission)
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Closed)?;
        let active = ActiveGuard::enter(Arc::clone(&self.stats));
        self.stats.submitted.fetch_add(1, Ordering::Relaxed);

        let converter = Arc::clone(&self.converter);
        let stats = Arc::clone(&self.stats);

        debug!(job_id = %job.job_id, "conversion submitted");

        self.jobs.spawn(async move {
            // Released when the task ends, however it ends.
            let _permit = permit;
            let _active = active;

            let result = match AssertUnwindSafe(converter.convert(job.clone()))
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(panic) => Err(ConverterError::Panicked {
                    reason: panic_message(panic.as_ref()),
                }),
            };

            match &result {
                Ok(r) => {
                    stats.completed.fetch_add(1, Ordering::Relaxed);
                    debug!(job_id = %r.job_id, duration_ms = r.duration_ms, "conversion finished");
                }
                Err(e) => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    debug!(job_id = %job.job_id, error = %e, "conversion failed");
                }
            }

            JobOutcome { job, result }
        });

        Ok(())
    }

    /// Collects jobs that have already finished, without waiting.
    pub fn try_reap(&mut self) -> Vec<JobOutcome> {
        let mut finished = Vec::new();
        while let Some(joined) = self.jobs.try_join_next() {
            if let Some(outcome) = Self::unwrap_join(joined) {
                finished.push(outcome);
            }
        }
        finished
    }

    /// Waits for every outstanding job and returns their outcomes in
    /// completion order.
    pub async fn drain(&mut self) -> Vec<JobOutcome> {
        let mut finished = Vec::with_capacity(self.jobs.len());
        while let Some(joined) = self.jobs.join_next().await {
            if let Some(outcome) = Self::unwrap_join(joined) {
                finished.push(outcome);
            }
        }
        finished
    }

    fn unwrap_join(joined: Result<JobOutcome, JoinError>) -> Option<JobOutcome> {
        match joined {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                // Only reachable if the task was aborted; panics are caught inside the job.
                error!("conversion task lost: {}", e);
                None
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
