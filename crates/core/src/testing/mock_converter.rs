//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{ConversionJob, ConversionResult, Converter, ConverterError};

/// Bytes written to the output path of a successful mock conversion.
const MOCK_OUTPUT: &[u8] = b"mock heic";

/// A recorded conversion job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    /// The job that was submitted.
    pub job: ConversionJob,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Track conversion jobs for assertions
/// - Simulate failures and panics for chosen inputs
/// - Control conversion duration
/// - Observe how many conversions ran at the same time
///
/// Clones share state, so a test can keep one handle and give another to the
/// code under test.
#[derive(Debug, Clone)]
pub struct MockConverter {
    /// Recorded conversions.
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    /// Inputs (matched by path suffix) that fail.
    fail_paths: Arc<RwLock<HashSet<PathBuf>>>,
    /// Inputs (matched by path suffix) that panic.
    panic_paths: Arc<RwLock<HashSet<PathBuf>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ConverterError>>>,
    /// Simulated conversion duration in milliseconds.
    conversion_duration_ms: Arc<RwLock<u64>>,
    /// Whether a successful conversion writes a file at the output path.
    write_output: Arc<RwLock<bool>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight counter when a conversion ends, even by panic.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self {
            conversions: Arc::new(RwLock::new(Vec::new())),
            fail_paths: Arc::new(RwLock::new(HashSet::new())),
            panic_paths: Arc::new(RwLock::new(HashSet::new())),
            next_error: Arc::new(RwLock::new(None)),
            conversion_duration_ms: Arc::new(RwLock::new(0)),
            write_output: Arc::new(RwLock::new(true)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Clear recorded conversions.
    pub async fn clear_recorded(&self) {
        self.conversions.write().await.clear();
    }

    /// Get the number of conversions performed.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Make conversions of inputs ending with `path` fail.
    pub async fn fail_on(&self, path: impl AsRef<Path>) {
        self.fail_paths
            .write()
            .await
            .insert(path.as_ref().to_path_buf());
    }

    /// Make conversions of inputs ending with `path` panic.
    pub async fn panic_on(&self, path: impl AsRef<Path>) {
        self.panic_paths
            .write()
            .await
            .insert(path.as_ref().to_path_buf());
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated conversion duration.
    pub async fn set_conversion_duration(&self, duration: Duration) {
        *self.conversion_duration_ms.write().await = duration.as_millis() as u64;
    }

    /// Enable or disable writing a placeholder output file.
    pub async fn set_write_output(&self, write: bool) {
        *self.write_output.write().await = write;
    }

    /// Conversions running right now.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of conversions that ran at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<ConverterError> {
        self.next_error.write().await.take()
    }

    async fn matches(set: &RwLock<HashSet<PathBuf>>, input: &Path) -> bool {
        set.read().await.iter().any(|p| input.ends_with(p))
    }

    async fn record(&self, job: &ConversionJob, success: bool) {
        self.conversions.write().await.push(RecordedConversion {
            job: job.clone(),
            success,
        });
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, job: ConversionJob) -> Result<ConversionResult, ConverterError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);

        // Simulate conversion time
        let duration_ms = *self.conversion_duration_ms.read().await;
        if duration_ms > 0 {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        }

        if Self::matches(&self.panic_paths, &job.input_path).await {
            panic!("mock converter panic for {}", job.input_path.display());
        }

        if let Some(err) = self.take_error().await {
            self.record(&job, false).await;
            return Err(err);
        }

        if Self::matches(&self.fail_paths, &job.input_path).await {
            self.record(&job, false).await;
            return Err(ConverterError::conversion_failed(
                "mock failure",
                Some(format!("cannot decode {}", job.input_path.display())),
            ));
        }

        if *self.write_output.read().await {
            if let Err(e) = tokio::fs::write(&job.output_path, MOCK_OUTPUT).await {
                self.record(&job, false).await;
                return Err(ConverterError::Io(e));
            }
        }

        self.record(&job, true).await;

        Ok(ConversionResult {
            job_id: job.job_id,
            output_path: job.output_path,
            output_size_bytes: MOCK_OUTPUT.len() as u64,
            duration_ms,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(())
    }
}
