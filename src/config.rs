use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::error::ConfigError;

/// Config file looked up in the watched root when no explicit path is given.
pub const CONFIG_FILE: &str = "cfx-sorter.toml";

/// Configuration loaded from `cfx-sorter.toml`.
///
/// Every key is optional; missing keys take the defaults the CFX96 export
/// layout has historically used.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SorterConfig {
    /// Token separating the run title from the rest of an exported file name.
    pub separator: String,
    /// Substrings marking quantification result exports (case-sensitive).
    pub raw_result_markers: Vec<String>,
    /// Glob patterns matched against base names; matches are never moved.
    pub ignore: Vec<String>,
    /// Pause before each move so the instrument can release the file.
    pub move_delay_ms: u64,
    /// Log file path. Relative paths are resolved against the watched root.
    pub log_file: PathBuf,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self {
            separator: " - ".to_string(),
            raw_result_markers: vec![
                "Quantification Cq Results_0".to_string(),
                "Quantification Amplification Results".to_string(),
            ],
            ignore: vec![
                "*.DS_Store*".to_string(),
                "Thumbs.db".to_string(),
                "desktop.ini".to_string(),
                "*.log".to_string(),
            ],
            move_delay_ms: 1000,
            log_file: PathBuf::from("cfx-sorter.log"),
            log_level: "info".to_string(),
        }
    }
}

impl SorterConfig {
    /// Load configuration from `cfx-sorter.toml` in the given root directory.
    ///
    /// Returns a default configuration if the file does not exist or cannot be parsed.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("warning: failed to parse {CONFIG_FILE}: {err}. Using defaults.");
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!("warning: failed to read {CONFIG_FILE}: {err}. Using defaults.");
                Self::default()
            }
        }
    }

    /// Load configuration from an explicitly named file. Unlike [`load`](Self::load),
    /// a missing or malformed file is an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Resolve the config for a watched root: the explicit file if one was given,
    /// otherwise `cfx-sorter.toml` in the root.
    pub fn resolve(root: &Path, explicit: Option<&Path>) -> anyhow::Result<Self> {
        let config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => Self::load(root),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.is_empty() {
            return Err(ConfigError::EmptySeparator);
        }
        if self.raw_result_markers.iter().any(|m| m.is_empty()) {
            return Err(ConfigError::EmptyMarker);
        }
        for pattern in &self.ignore {
            if let Err(err) = glob::Pattern::new(pattern) {
                return Err(ConfigError::BadPattern {
                    pattern: pattern.clone(),
                    reason: err.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }

    /// Absolute log file path for a watched root.
    pub fn log_path(&self, root: &Path) -> PathBuf {
        if self.log_file.is_absolute() {
            self.log_file.clone()
        } else {
            root.join(&self.log_file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SorterConfig::load(dir.path());
        assert_eq!(config.separator, " - ");
        assert_eq!(config.move_delay(), Duration::from_secs(1));
        assert_eq!(config.raw_result_markers.len(), 2);
    }

    #[test]
    fn test_load_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "separator = \"-\"\nmove_delay_ms = 250\n",
        )
        .unwrap();

        let config = SorterConfig::load(dir.path());
        assert_eq!(config.separator, "-");
        assert_eq!(config.move_delay(), Duration::from_millis(250));
        assert!(
            config.ignore.contains(&"*.log".to_string()),
            "unspecified keys should keep defaults"
        );
    }

    #[test]
    fn test_load_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "separator = [").unwrap();
        let config = SorterConfig::load(dir.path());
        assert_eq!(config.separator, " - ");
    }

    #[test]
    fn test_load_from_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "move_delay_ms = \"soon\"").unwrap();
        assert!(SorterConfig::load_from(&path).is_err());
        assert!(SorterConfig::load_from(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_separator_and_bad_glob() {
        let config = SorterConfig {
            separator: String::new(),
            ..SorterConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptySeparator)));

        let config = SorterConfig {
            ignore: vec!["[".to_string()],
            ..SorterConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadPattern { .. })
        ));

        let config = SorterConfig {
            raw_result_markers: vec![String::new()],
            ..SorterConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyMarker)));
    }

    #[test]
    fn test_log_path_relative_to_root() {
        let config = SorterConfig::default();
        let root = Path::new("/watch");
        assert_eq!(config.log_path(root), PathBuf::from("/watch/cfx-sorter.log"));

        let config = SorterConfig {
            log_file: PathBuf::from("/var/log/cfx.log"),
            ..SorterConfig::default()
        };
        assert_eq!(config.log_path(root), PathBuf::from("/var/log/cfx.log"));
    }
}
