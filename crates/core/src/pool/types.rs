//! Types reported by the conversion pool.

use serde::{Deserialize, Serialize};

use crate::converter::{ConversionJob, ConversionResult, ConverterError};

/// Snapshot of pool activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Number of admission slots.
    pub max_concurrency: usize,
    /// Jobs currently holding a slot.
    pub active_jobs: usize,
    /// Highest `active_jobs` observed.
    pub peak_active_jobs: usize,
    pub total_submitted: u64,
    pub total_completed: u64,
    pub total_failed: u64,
}

/// Finished job together with what the converter returned.
#[derive(Debug)]
pub struct JobOutcome {
    pub job: ConversionJob,
    pub result: Result<ConversionResult, ConverterError>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
