//! Types for conversion jobs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single image to re-encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionJob {
    /// Identifier used in logs; the source-relative path.
    pub job_id: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl ConversionJob {
    pub fn new(job_id: impl Into<String>, input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            job_id: job_id.into(),
            input_path,
            output_path,
        }
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub job_id: String,
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    /// Wall time spent in the codec.
    pub duration_ms: u64,
}
