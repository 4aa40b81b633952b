//! Types produced by a sync run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::classify::MediaKind;
use crate::pool::PoolStatus;

/// Include glob used when none is given: every file at any depth.
pub const DEFAULT_INCLUDE: &str = "**/*";

/// Per-run options that do not belong in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Glob relative to the source root selecting candidate files.
    pub include: String,
    /// Report actions without writing anything.
    pub dry_run: bool,
    /// Reserved event filter. Accepted and logged, has no effect.
    pub include_event: Option<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            include: DEFAULT_INCLUDE.to_string(),
            dry_run: false,
            include_event: None,
        }
    }
}

impl SyncOptions {
    pub fn with_include(mut self, include: impl Into<String>) -> Self {
        self.include = include.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_include_event(mut self, event: impl Into<String>) -> Self {
        self.include_event = Some(event.into());
        self
    }
}

/// One line of the action log: a source file and where it lands.
///
/// Both paths are relative to their roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: MediaKind,
}

impl fmt::Display for ActionLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.source.display(),
            self.destination.display()
        )
    }
}

/// Why a file produced no work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Excluded,
    Ignorable,
    AlreadyExists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Excluded => "excluded",
            Self::Ignorable => "ignorable",
            Self::AlreadyExists => "already exists",
        };
        f.write_str(s)
    }
}

/// Final decision for one visited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDisposition {
    Excluded,
    Ignored,
    AlreadyExists,
    /// Handed to the conversion pool.
    Submitted,
    /// Copied on the control task.
    Copied,
    /// Would have been converted or copied, but this is a dry run.
    Planned,
}

/// A conversion that did not produce its mirror file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionFailure {
    /// Source-relative path of the image.
    pub source: PathBuf,
    /// Destination-relative path that was being written.
    pub destination: PathBuf,
    pub error: String,
    /// Codec diagnostics, when the converter captured any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

/// Events emitted while a run is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncProgress {
    /// The walk finished; `total` candidate files will be visited.
    Started { total: usize },
    /// A file was dispatched (or planned, in a dry run).
    Action(ActionLogEntry),
    /// A file was visited and produced no work.
    Skipped { path: PathBuf, reason: SkipReason },
    /// A conversion finished with an error.
    ConversionFailed(ConversionFailure),
    /// Scheduling is over; waiting for the remaining conversions.
    Draining { outstanding: usize },
    Finished,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub dry_run: bool,
    /// Action log, in walk order.
    pub actions: Vec<ActionLogEntry>,
    pub submitted: usize,
    /// Conversions that finished successfully.
    pub converted: usize,
    pub copied: usize,
    pub planned: usize,
    pub already_exists: usize,
    pub excluded: usize,
    pub ignored: usize,
    pub failures: Vec<ConversionFailure>,
    pub pool: PoolStatus,
    pub elapsed_ms: u64,
}

impl SyncReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, disposition: FileDisposition) {
        match disposition {
            FileDisposition::Excluded => self.excluded += 1,
            FileDisposition::Ignored => self.ignored += 1,
            FileDisposition::AlreadyExists => self.already_exists += 1,
            FileDisposition::Submitted => self.submitted += 1,
            FileDisposition::Copied => self.copied += 1,
            FileDisposition::Planned => self.planned += 1,
        }
    }

    /// Files visited, whatever their outcome.
    pub fn visited(&self) -> usize {
        self.excluded + self.ignored + self.already_exists + self.submitted + self.copied + self.planned
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
