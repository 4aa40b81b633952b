//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the ImageMagick based converter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Path to the `magick` binary.
    #[serde(default = "default_magick_path")]
    pub magick_path: PathBuf,

    /// Encoder quality, 1..=100. Codec default when unset.
    #[serde(default)]
    pub quality: Option<u8>,

    /// Additional arguments placed between input and output.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_magick_path() -> PathBuf {
    PathBuf::from("magick")
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            magick_path: default_magick_path(),
            quality: None,
            extra_args: Vec::new(),
        }
    }
}

impl ConverterConfig {
    /// Creates a new config with a custom binary path.
    pub fn with_path(magick_path: PathBuf) -> Self {
        Self {
            magick_path,
            ..Default::default()
        }
    }

    /// Sets the encoder quality.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Appends extra codec arguments.
    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }
}
