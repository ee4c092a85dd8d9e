use std::path::Path;

use crate::config::{CONFIG_FILE, SorterConfig};
use crate::error::ConfigError;

/// Matches base names that are never relocated: platform bookkeeping files,
/// log files, and the files this process keeps in the watched root itself.
#[derive(Debug, Clone, Default)]
pub struct ArtifactFilter {
    patterns: Vec<glob::Pattern>,
    own_files: Vec<String>,
}

impl ArtifactFilter {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|err| ConfigError::BadPattern {
                    pattern: p.clone(),
                    reason: err.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            own_files: Vec::new(),
        })
    }

    /// Build the filter for a watched root, protecting the config file and the
    /// log file in addition to the configured patterns.
    pub fn from_config(config: &SorterConfig, root: &Path) -> Result<Self, ConfigError> {
        let mut filter = Self::new(&config.ignore)?;
        filter.own_files.push(CONFIG_FILE.to_string());
        if let Some(name) = config.log_path(root).file_name().and_then(|n| n.to_str()) {
            filter.own_files.push(name.to_string());
        }
        Ok(filter)
    }

    pub fn is_ignorable(&self, file_name: &str) -> bool {
        self.own_files.iter().any(|own| own == file_name)
            || self.patterns.iter().any(|p| p.matches(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_filter() -> ArtifactFilter {
        ArtifactFilter::from_config(&SorterConfig::default(), Path::new("/watch")).unwrap()
    }

    #[test]
    fn test_platform_bookkeeping_files_are_ignorable() {
        let f = default_filter();
        assert!(f.is_ignorable(".DS_Store"));
        assert!(f.is_ignorable("RunA - plate.DS_Store.tmp"));
        assert!(f.is_ignorable("Thumbs.db"));
        assert!(f.is_ignorable("desktop.ini"));
    }

    #[test]
    fn test_log_files_are_ignorable() {
        let f = default_filter();
        assert!(f.is_ignorable("RunA - instrument.log"));
        assert!(f.is_ignorable("cfx-sorter.log"));
    }

    #[test]
    fn test_own_files_are_ignorable_even_without_patterns() {
        let config = SorterConfig {
            ignore: Vec::new(),
            log_file: "sorter.txt".into(),
            ..SorterConfig::default()
        };
        let f = ArtifactFilter::from_config(&config, Path::new("/watch")).unwrap();
        assert!(f.is_ignorable("sorter.txt"));
        assert!(f.is_ignorable(CONFIG_FILE));
        assert!(!f.is_ignorable("notes.txt"));
    }

    #[test]
    fn test_exports_are_not_ignorable() {
        let f = default_filter();
        assert!(!f.is_ignorable("RunA - Quantification Cq Results_0.csv"));
        assert!(!f.is_ignorable("notes.txt"));
        assert!(!f.is_ignorable("RunA - logbook.pdf"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(ArtifactFilter::new(&["[".to_string()]).is_err());
    }
}
