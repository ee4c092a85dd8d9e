//! Activity reporting port.
//!
//! Components never touch a global logger directly. They are handed an
//! `Arc<dyn ActivityLog>` and report what they did as [`Activity`] values;
//! the binary wires in [`TracingActivityLog`], tests use [`MemoryActivityLog`].

use std::path::PathBuf;

/// A notable action taken (or refused) while handling one creation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    /// File relocated; `dest_dir` is the destination directory's own name.
    Moved { file: String, dest_dir: String },
    /// Target already occupied; the source was left in place.
    Collision { file: String, target: PathBuf },
    /// Rename failed for any other reason.
    MoveFailed { file: String, reason: String },
    /// The destination tree could not be created.
    ProvisionFailed { file: String, reason: String },
    /// Ignorable artifact; nothing was touched.
    Ignored { file: String },
    /// A missing destination directory was created.
    DirectoryCreated { path: PathBuf },
    /// The OS watch reported an error; watching continues.
    WatchFailed { reason: String },
}

pub trait ActivityLog: Send + Sync {
    fn record(&self, activity: &Activity);
}

/// Renders activities as plain-text `tracing` events, one line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingActivityLog;

impl ActivityLog for TracingActivityLog {
    fn record(&self, activity: &Activity) {
        match activity {
            Activity::Moved { file, dest_dir } => {
                tracing::info!("Moved {file} to {dest_dir}");
            }
            Activity::Collision { file, target } => {
                tracing::error!(
                    "File: {file} was not moved, {} already exists",
                    target.display()
                );
            }
            Activity::MoveFailed { file, reason } => {
                tracing::error!(
                    "File: {file} could not be moved to the correct directory: {reason}"
                );
            }
            Activity::ProvisionFailed { file, reason } => {
                tracing::error!("File: {file} left in place, destination unavailable: {reason}");
            }
            Activity::Ignored { file } => {
                tracing::debug!("Ignored {file}");
            }
            Activity::DirectoryCreated { path } => {
                tracing::debug!("Created {}", path.display());
            }
            Activity::WatchFailed { reason } => {
                tracing::warn!("watcher error: {reason}");
            }
        }
    }
}

/// Keeps every activity in memory, in order.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryActivityLog {
    entries: std::sync::Mutex<Vec<Activity>>,
}

#[cfg(test)]
impl MemoryActivityLog {
    pub fn entries(&self) -> Vec<Activity> {
        self.entries.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ActivityLog for MemoryActivityLog {
    fn record(&self, activity: &Activity) {
        self.entries.lock().unwrap().push(activity.clone());
    }
}
