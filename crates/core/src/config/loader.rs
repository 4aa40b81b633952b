use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// File name of the configuration in the user's home directory.
pub const DEFAULT_CONFIG_FILE_NAME: &str = ".syncpics";

/// `~/.syncpics`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(DEFAULT_CONFIG_FILE_NAME))
}

/// Load configuration from file with environment variable overrides
///
/// Overrides use the `SYNCPICS_` prefix and `__` between table and key, e.g.
/// `SYNCPICS_POOL__MAX_CONCURRENCY=2`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("SYNCPICS_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config.normalized())
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str::<Config>(toml_str)
        .map(Config::normalized)
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[syncpics]
source = "/src"
destination = "/dst"
excludes = [" **/private/* "]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.syncpics.destination, PathBuf::from("/dst"));
        assert_eq!(config.syncpics.excludes, vec!["**/private/*"]);
    }

    #[test]
    fn test_load_config_from_str_missing_section() {
        let result = load_config_from_str("[converter]\nquality = 50\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/.syncpics"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[syncpics]
source = "/photos/lightroom"
destination = "/photos/mirror"
excludes = ["*.tmp  "]

[pool]
max_concurrency = 2
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.syncpics.source, PathBuf::from("/photos/lightroom"));
        assert_eq!(config.syncpics.excludes, vec!["*.tmp"]);
        assert_eq!(config.pool.max_concurrency, 2);
    }

    #[test]
    fn test_load_config_malformed_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[syncpics\nsource = ").unwrap();

        let result = load_config(temp_file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_default_config_path_file_name() {
        if let Some(path) = default_config_path() {
            assert_eq!(path.file_name().unwrap(), DEFAULT_CONFIG_FILE_NAME);
        }
    }
}
