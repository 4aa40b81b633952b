//! The sync run: walk the source tree, decide each file, dispatch work.
//!
//! A run is driven by a single control task. Files are visited in a fixed
//! order and each one is, in turn, excluded, ignored, skipped because its
//! mirror already exists, submitted to the conversion pool, or copied
//! verbatim. An unrecognized extension stops the walk; conversions already
//! in flight are still waited for before the run returns.

mod config;
mod error;
mod runner;
mod types;
mod walk;

pub use config::{FailurePolicy, SyncSettings};
pub use error::SyncError;
pub use runner::SyncOrchestrator;
pub use types::{
    ActionLogEntry, ConversionFailure, FileDisposition, SkipReason, SyncOptions, SyncProgress,
    SyncReport, DEFAULT_INCLUDE,
};
pub use walk::{collect_entries, FileEntry};
