//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// ImageMagick binary not found.
    #[error("ImageMagick not found at path: {path}")]
    MagickNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Conversion process failed.
    #[error("Conversion failed: {reason}")]
    ConversionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// The conversion task panicked.
    #[error("Conversion panicked: {reason}")]
    Panicked { reason: String },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a new conversion failed error with stderr output.
    pub fn conversion_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ConversionFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Captured stderr of the codec, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::ConversionFailed { stderr, .. } => stderr.as_deref(),
            _ => None,
        }
    }

    /// Whether this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_failed_carries_stderr() {
        let err = ConverterError::conversion_failed("exit 1", Some("no decode delegate".into()));
        assert_eq!(err.to_string(), "Conversion failed: exit 1");
        assert_eq!(err.stderr(), Some("no decode delegate"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_io_is_retryable() {
        let err = ConverterError::from(std::io::Error::other("disk hiccup"));
        assert!(err.is_retryable());
        assert!(err.stderr().is_none());
    }
}
