//! Errors that end a sync run.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::ConfigError;
use crate::converter::ConverterError;
use crate::copier::CopyError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid include pattern '{pattern}': {reason}")]
    InvalidInclude { pattern: String, reason: String },

    /// A file whose extension is in none of the known sets.
    #[error("Unhandled format for: {}", path.display())]
    UnrecognizedFormat { path: PathBuf },

    /// A conversion failed while failures are configured to abort.
    #[error("conversion of {} failed: {source}", path.display())]
    ConversionFailed {
        path: PathBuf,
        #[source]
        source: ConverterError,
    },

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("copy of {} failed: {source}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: CopyError,
    },

    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("source walk did not complete: {0}")]
    WalkInterrupted(String),

    #[error("conversion pool closed")]
    PoolClosed,
}

impl SyncError {
    pub(crate) fn filesystem(path: &Path, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_format_message() {
        let err = SyncError::UnrecognizedFormat {
            path: PathBuf::from("/photos/lightroom/weird.TXT"),
        };
        assert_eq!(
            err.to_string(),
            "Unhandled format for: /photos/lightroom/weird.TXT"
        );
    }

    #[test]
    fn test_conversion_failed_keeps_source() {
        use std::error::Error as _;

        let err = SyncError::ConversionFailed {
            path: PathBuf::from("a/b.jpg"),
            source: ConverterError::conversion_failed("bad data", None),
        };
        assert!(err.to_string().contains("a/b.jpg"));
        assert!(err.source().is_some());
    }
}
