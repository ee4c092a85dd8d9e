//! Error types for configuration, provisioning and the watch source.

use std::path::PathBuf;

use thiserror::Error;

/// A destination directory could not be created.
#[derive(Error, Debug)]
#[error("cannot create directory {}: {source}", path.display())]
pub struct ProvisionError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Configuration values that would make classification meaningless.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("separator must not be empty")]
    EmptySeparator,

    #[error("raw result markers must not be empty strings")]
    EmptyMarker,

    #[error("invalid ignore pattern '{pattern}': {reason}")]
    BadPattern { pattern: String, reason: String },
}

/// Errors from starting the filesystem watch.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("failed to initialize watcher: {reason}")]
    Init { reason: String },

    #[error("cannot watch path {}: {reason}", path.display())]
    PathWatch { path: PathBuf, reason: String },
}

impl From<notify::Error> for WatchError {
    fn from(e: notify::Error) -> Self {
        WatchError::Init {
            reason: e.to_string(),
        }
    }
}
