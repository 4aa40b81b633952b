//! Configuration for the conversion pool.

use serde::{Deserialize, Serialize};

/// Configuration for the conversion pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum conversions running at once. Must be at least 1.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

/// One less than the available parallelism, never below 1. Leaves a core for
/// the walk and the copies.
pub fn default_max_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl PoolConfig {
    /// Sets the maximum concurrent conversions.
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_at_least_one() {
        let config = PoolConfig::default();
        assert!(config.max_concurrency >= 1);
        assert_eq!(config.max_concurrency, default_max_concurrency());
    }

    #[test]
    fn test_default_leaves_one_core() {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        if cpus > 1 {
            assert_eq!(default_max_concurrency(), cpus - 1);
        } else {
            assert_eq!(default_max_concurrency(), 1);
        }
    }

    #[test]
    fn test_builder_and_deserialize() {
        let config = PoolConfig::default().with_max_concurrency(3);
        assert_eq!(config.max_concurrency, 3);

        let parsed: PoolConfig = toml::from_str("max_concurrency = 6").unwrap();
        assert_eq!(parsed.max_concurrency, 6);

        let parsed: PoolConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.max_concurrency, default_max_concurrency());
    }
}
