use super::{types::Config, ConfigError};
use crate::exclude::ExclusionMatcher;

/// Validate configuration
/// Currently validates:
/// - Source is an existing directory
/// - Destination is set and lies outside the source tree
/// - Pool has at least one slot
/// - Converter quality is within 1..=100
/// - Every exclusion pattern compiles
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let source = &config.syncpics.source;
    let destination = &config.syncpics.destination;

    if !source.is_dir() {
        return Err(ConfigError::ValidationError(format!(
            "syncpics.source is not a directory: {}",
            source.display()
        )));
    }

    if destination.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "syncpics.destination cannot be empty".to_string(),
        ));
    }

    if destination.starts_with(source) {
        return Err(ConfigError::ValidationError(format!(
            "syncpics.destination {} must not be inside syncpics.source {}",
            destination.display(),
            source.display()
        )));
    }

    if config.pool.max_concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "pool.max_concurrency must be at least 1".to_string(),
        ));
    }

    if let Some(quality) = config.converter.quality {
        if !(1..=100).contains(&quality) {
            return Err(ConfigError::ValidationError(format!(
                "converter.quality must be between 1 and 100, got {}",
                quality
            )));
        }
    }

    ExclusionMatcher::new(config.syncpics.excludes.as_slice()).map_err(|e| {
        ConfigError::ValidationError(format!("invalid exclusion pattern: {}", e))
    })?;

    Ok(())
}
