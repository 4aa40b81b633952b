use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::converter::ConverterConfig;
use crate::pool::PoolConfig;
use crate::sync::SyncSettings;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub syncpics: SyncConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub sync: SyncSettings,
}

impl Config {
    /// Trims exclusion patterns and drops blank ones.
    pub fn normalized(mut self) -> Self {
        self.syncpics.excludes = self
            .syncpics
            .excludes
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }
}

/// The `[syncpics]` table: what to mirror, where, and what to leave out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Root of the photo library.
    pub source: PathBuf,
    /// Root of the mirror tree.
    pub destination: PathBuf,
    /// Globs matched against source-relative paths.
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl SyncConfig {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            excludes: Vec::new(),
        }
    }

    pub fn with_excludes<I, S>(mut self, excludes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes = excludes.into_iter().map(Into::into).collect();
        self
    }
}
