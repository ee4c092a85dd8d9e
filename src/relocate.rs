use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::activity::{Activity, ActivityLog};
use crate::artifacts::ArtifactFilter;

/// Result of one relocation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { target: PathBuf },
    SkippedIgnorable,
    /// The target was already occupied. Nothing was overwritten or moved.
    SkippedCollision { target: PathBuf },
    Failed { reason: String },
}

/// Moves freshly exported files into their destination directory without
/// ever replacing an existing file.
pub struct Relocator {
    delay: Duration,
    filter: ArtifactFilter,
    log: Arc<dyn ActivityLog>,
}

impl Relocator {
    pub fn new(delay: Duration, filter: ArtifactFilter, log: Arc<dyn ActivityLog>) -> Self {
        Self { delay, filter, log }
    }

    /// Move `source` into `destination`, keeping its base name.
    ///
    /// Waits `delay` before renaming: on some platforms the creation
    /// notification arrives while the instrument software still has the file
    /// open. Failures are reported and returned, never retried.
    pub async fn relocate(&self, destination: &Path, source: &Path) -> MoveOutcome {
        let Some(file_name) = source.file_name().map(|n| n.to_string_lossy().into_owned())
        else {
            let reason = format!("{} has no file name", source.display());
            self.log.record(&Activity::MoveFailed {
                file: source.display().to_string(),
                reason: reason.clone(),
            });
            return MoveOutcome::Failed { reason };
        };

        if self.filter.is_ignorable(&file_name) {
            return MoveOutcome::SkippedIgnorable;
        }

        let target = destination.join(&file_name);
        if occupied(&target) {
            return self.collision(file_name, target);
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        // Something may have landed on the target during the delay.
        if occupied(&target) {
            return self.collision(file_name, target);
        }

        match tokio::fs::rename(source, &target).await {
            Ok(()) => {
                let dest_dir = destination
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| destination.display().to_string());
                self.log.record(&Activity::Moved {
                    file: file_name,
                    dest_dir,
                });
                MoveOutcome::Moved { target }
            }
            Err(err) => {
                let reason = err.to_string();
                self.log.record(&Activity::MoveFailed {
                    file: file_name,
                    reason: reason.clone(),
                });
                MoveOutcome::Failed { reason }
            }
        }
    }

    fn collision(&self, file: String, target: PathBuf) -> MoveOutcome {
        self.log.record(&Activity::Collision {
            file,
            target: target.clone(),
        });
        MoveOutcome::SkippedCollision { target }
    }
}

/// True for anything at `path`, including dangling symlinks.
fn occupied(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}
