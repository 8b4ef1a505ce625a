//! Optional TOML configuration.
//!
//! Looked up in this order:
//! 1. `--config <FILE>`
//! 2. `PRUNE_BACKUPS_CONFIG`
//! 3. `<config dir>/prune_backups/config.toml`
//!
//! An explicitly named file must exist. The default location is optional.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use prune_retention::DEFAULT_ARCHIVE_DIR;
use prune_stats::StatsConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Configuration file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Directory below the platform config dir.
pub const CONFIG_DIR_NAME: &str = "prune_backups";

/// Environment variable for a custom config file path.
pub const CONFIG_ENV: &str = "PRUNE_BACKUPS_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid verbosity {0} in config file (expected 0, 1 or 2)")]
    Verbosity(u8),
}

/// Settings file contents. Command-line flags take precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneConfig {
    /// Archive directory name, relative to the pruned directory.
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,

    /// 0 - mute, 1 - some, 2 - a lot.
    #[serde(default = "default_verbosity")]
    pub verbosity: u8,

    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub stats: StatsConfig,
}

fn default_archive_dir() -> String {
    DEFAULT_ARCHIVE_DIR.to_string()
}

fn default_verbosity() -> u8 {
    1
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            archive_dir: default_archive_dir(),
            verbosity: default_verbosity(),
            log_level: None,
            stats: StatsConfig::default(),
        }
    }
}

impl PruneConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: PruneConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.verbosity > 2 {
            return Err(ConfigError::Verbosity(config.verbosity));
        }
        Ok(config)
    }

    /// Load a config file that must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml_str(&text, path)
    }

    /// Find and load the config file for this run, or fall back to defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::discover_from(explicit, std::env::var_os(CONFIG_ENV), default_config_path())
    }

    fn discover_from(
        explicit: Option<&Path>,
        env_path: Option<OsString>,
        default_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(path) = env_path.filter(|p| !p.is_empty()) {
            return Self::load(Path::new(&path));
        }
        match default_path {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// `<config dir>/prune_backups/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = PruneConfig::from_toml_str("", Path::new("c.toml")).unwrap();
        assert_eq!(config.archive_dir, "to_delete");
        assert_eq!(config.verbosity, 1);
        assert!(config.log_level.is_none());
        assert_eq!(config.stats.retry_attempts, 1000);
    }

    #[test]
    fn test_full_file() {
        let text = r#"
archive_dir = "old"
verbosity = 2
log_level = "debug"

[stats]
max_concurrency = 4
retry_attempts = 10
retry_min_wait_ms = 5
retry_max_jitter_ms = 0
"#;
        let config = PruneConfig::from_toml_str(text, Path::new("c.toml")).unwrap();
        assert_eq!(config.archive_dir, "old");
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.stats.max_concurrency, 4);
        assert_eq!(config.stats.retry_attempts, 10);
    }

    #[test]
    fn test_invalid_verbosity() {
        let err = PruneConfig::from_toml_str("verbosity = 5", Path::new("c.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Verbosity(5)));
    }

    #[test]
    fn test_malformed_file() {
        let err = PruneConfig::from_toml_str("archive_dir = ", Path::new("c.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        let err = PruneConfig::discover_from(Some(&missing), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_missing_default_file_is_fine() {
        let temp = TempDir::new().unwrap();
        let config =
            PruneConfig::discover_from(None, None, Some(temp.path().join("config.toml"))).unwrap();
        assert_eq!(config.archive_dir, "to_delete");
    }

    #[test]
    fn test_lookup_order() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("explicit.toml");
        let from_env = temp.path().join("env.toml");
        let default = temp.path().join("default.toml");
        std::fs::write(&explicit, "archive_dir = \"explicit\"").unwrap();
        std::fs::write(&from_env, "archive_dir = \"env\"").unwrap();
        std::fs::write(&default, "archive_dir = \"default\"").unwrap();

        let pick = |explicit: Option<&Path>, env: Option<&Path>| {
            PruneConfig::discover_from(
                explicit,
                env.map(|p| p.as_os_str().to_os_string()),
                Some(default.clone()),
            )
            .unwrap()
            .archive_dir
        };

        assert_eq!(pick(Some(&explicit), Some(&from_env)), "explicit");
        assert_eq!(pick(None, Some(&from_env)), "env");
        assert_eq!(pick(None, None), "default");
    }
}
