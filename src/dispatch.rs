use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc;

use crate::activity::{Activity, ActivityLog};
use crate::artifacts::ArtifactFilter;
use crate::classifier::Classifier;
use crate::config::SorterConfig;
use crate::error::ConfigError;
use crate::provision::Provisioner;
use crate::relocate::{MoveOutcome, Relocator};
use crate::watcher::event::CreationEvent;

/// What happened to one creation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Directory creations (including our own) are never processed.
    DirectoryIgnored,
    /// The path is not a direct child of the watched root.
    OutsideRoot,
    /// The file name is not valid UTF-8 and cannot be classified; left in place.
    UnreadableName,
    /// Ignorable artifact; no destination was provisioned.
    Ignored,
    ProvisionFailed,
    Relocated(MoveOutcome),
}

/// Runs classify → provision → relocate for each creation event, one event
/// at a time. No error escapes: a failing event is logged and abandoned.
pub struct Dispatcher {
    classifier: Classifier,
    filter: ArtifactFilter,
    provisioner: Provisioner,
    relocator: Relocator,
    log: Arc<dyn ActivityLog>,
}

impl Dispatcher {
    pub fn new(
        classifier: Classifier,
        filter: ArtifactFilter,
        provisioner: Provisioner,
        relocator: Relocator,
        log: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            classifier,
            filter,
            provisioner,
            relocator,
            log,
        }
    }

    /// Wire up every component for `root` from a validated config.
    pub fn from_config(
        root: &Path,
        config: &SorterConfig,
        log: Arc<dyn ActivityLog>,
    ) -> Result<Self, ConfigError> {
        let filter = ArtifactFilter::from_config(config, root)?;
        Ok(Self::new(
            Classifier::from_config(config),
            filter.clone(),
            Provisioner::new(root, log.clone()),
            Relocator::new(config.move_delay(), filter, log.clone()),
            log,
        ))
    }

    pub fn root(&self) -> &Path {
        self.provisioner.root()
    }

    /// Handle a single creation event observed on `today`.
    pub async fn handle(&self, event: &CreationEvent, today: NaiveDate) -> Dispatch {
        if event.is_dir {
            return Dispatch::DirectoryIgnored;
        }

        if event.path.parent() != Some(self.root()) {
            return Dispatch::OutsideRoot;
        }
        let Some(file_name) = event.path.file_name().and_then(|n| n.to_str()) else {
            self.log.record(&Activity::MoveFailed {
                file: event.path.display().to_string(),
                reason: "file name is not valid UTF-8".to_string(),
            });
            return Dispatch::UnreadableName;
        };

        if self.filter.is_ignorable(file_name) {
            self.log.record(&Activity::Ignored {
                file: file_name.to_string(),
            });
            return Dispatch::Ignored;
        }

        let classification = self.classifier.classify(file_name, today);
        let destination = match self.provisioner.ensure_destination(&classification) {
            Ok(dest) => dest,
            Err(err) => {
                self.log.record(&Activity::ProvisionFailed {
                    file: file_name.to_string(),
                    reason: err.to_string(),
                });
                return Dispatch::ProvisionFailed;
            }
        };

        Dispatch::Relocated(self.relocator.relocate(&destination, &event.path).await)
    }

    /// Consume events until the channel closes. Each event is dated with the
    /// local calendar day on which it is handled.
    pub async fn run(&self, mut events: mpsc::Receiver<CreationEvent>) {
        while let Some(event) = events.recv().await {
            let today = chrono::Local::now().date_naive();
            self.handle(&event, today).await;
        }
    }
}

/// Where `file_name` would be placed under `root`, or `None` if it is ignorable.
/// Touches nothing on disk.
pub fn preview(
    root: &Path,
    config: &SorterConfig,
    file_name: &str,
    today: NaiveDate,
) -> Result<Option<(crate::classifier::Classification, PathBuf)>, ConfigError> {
    let filter = ArtifactFilter::from_config(config, root)?;
    if filter.is_ignorable(file_name) {
        return Ok(None);
    }
    let classification = Classifier::from_config(config).classify(file_name, today);
    let target = root.join(classification.relative_dir()).join(file_name);
    Ok(Some((classification, target)))
}
