use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::activity::{Activity, ActivityLog};
use crate::classifier::{Classification, DATE_FORMAT, GENERAL_MISC_DIR, MISC_DIR, RAW_RESULTS_DIR};
use crate::error::ProvisionError;

/// Creates the destination hierarchy under the watched root on demand.
///
/// ```text
/// root/
///   GeneralMisc/
///   20240315/
///     RunA/
///       Misc/
///       RawResults/
/// ```
pub struct Provisioner {
    root: PathBuf,
    log: Arc<dyn ActivityLog>,
}

impl Provisioner {
    pub fn new(root: impl Into<PathBuf>, log: Arc<dyn ActivityLog>) -> Self {
        Self {
            root: root.into(),
            log,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Make sure the directory for `classification` exists and return it.
    ///
    /// For run files both `Misc` and `RawResults` are created, whichever
    /// category is asked for, so a run directory always has its full shape.
    /// Existing directories are accepted at every level; a partially created
    /// tree left by an earlier failure is completed on the next call.
    pub fn ensure_destination(
        &self,
        classification: &Classification,
    ) -> Result<PathBuf, ProvisionError> {
        match classification {
            Classification::Unclassified => {
                let general = self.root.join(GENERAL_MISC_DIR);
                self.ensure_dir(&general)?;
                Ok(general)
            }
            Classification::RunFile {
                date,
                run_title,
                category,
            } => {
                let daily = self.root.join(date.format(DATE_FORMAT).to_string());
                self.ensure_dir(&daily)?;

                let run = daily.join(run_title);
                self.ensure_dir(&run)?;

                self.ensure_dir(&run.join(MISC_DIR))?;
                self.ensure_dir(&run.join(RAW_RESULTS_DIR))?;

                Ok(run.join(category.dir_name()))
            }
        }
    }

    /// Create a single directory level. An existing directory is fine; an
    /// existing non-directory is not.
    fn ensure_dir(&self, path: &Path) -> Result<(), ProvisionError> {
        match std::fs::create_dir(path) {
            Ok(()) => {
                self.log.record(&Activity::DirectoryCreated {
                    path: path.to_path_buf(),
                });
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            Err(source) => Err(ProvisionError {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::MemoryActivityLog;
    use crate::classifier::Category;
    use chrono::NaiveDate;
    use std::fs;

    fn run_file(title: &str, category: Category) -> Classification {
        Classification::RunFile {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            run_title: title.to_string(),
            category,
        }
    }

    fn dir_set(root: &Path) -> Vec<PathBuf> {
        let mut out = Vec::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    out.push(path.strip_prefix(root).unwrap().to_path_buf());
                    stack.push(path);
                }
            }
        }
        out.sort();
        out
    }

    #[test]
    fn test_unclassified_goes_to_general_misc() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(MemoryActivityLog::default());
        let p = Provisioner::new(dir.path(), log.clone());

        let dest = p.ensure_destination(&Classification::Unclassified).unwrap();
        assert_eq!(dest, dir.path().join("GeneralMisc"));
        assert!(dest.is_dir());
        assert_eq!(dir_set(dir.path()), vec![PathBuf::from("GeneralMisc")]);
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn test_run_file_creates_full_run_tree() {
        let dir = tempfile::tempdir().unwrap();
        let p = Provisioner::new(dir.path(), Arc::new(MemoryActivityLog::default()));

        let dest = p
            .ensure_destination(&run_file("RunA", Category::RawResult))
            .unwrap();
        assert_eq!(dest, dir.path().join("20240315/RunA/RawResults"));
        assert_eq!(
            dir_set(dir.path()),
            vec![
                PathBuf::from("20240315"),
                PathBuf::from("20240315/RunA"),
                PathBuf::from("20240315/RunA/Misc"),
                PathBuf::from("20240315/RunA/RawResults"),
            ]
        );

        let misc = p.ensure_destination(&run_file("RunA", Category::Misc)).unwrap();
        assert_eq!(misc, dir.path().join("20240315/RunA/Misc"));
    }

    #[test]
    fn test_provisioning_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(MemoryActivityLog::default());
        let p = Provisioner::new(dir.path(), log.clone());
        let class = run_file("RunA", Category::Misc);

        let first = p.ensure_destination(&class).unwrap();
        let dirs_after_first = dir_set(dir.path());
        let created = log.entries().len();

        let second = p.ensure_destination(&class).unwrap();
        assert_eq!(first, second);
        assert_eq!(dir_set(dir.path()), dirs_after_first);
        assert_eq!(
            log.entries().len(),
            created,
            "second call should not create anything"
        );
    }

    #[test]
    fn test_completes_partially_created_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("20240315/RunA/Misc")).unwrap();
        let p = Provisioner::new(dir.path(), Arc::new(MemoryActivityLog::default()));

        let dest = p
            .ensure_destination(&run_file("RunA", Category::RawResult))
            .unwrap();
        assert!(dest.is_dir());
    }

    #[test]
    fn test_file_in_the_way_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("20240315"), "not a directory").unwrap();
        let p = Provisioner::new(dir.path(), Arc::new(MemoryActivityLog::default()));

        let err = p
            .ensure_destination(&run_file("RunA", Category::Misc))
            .unwrap_err();
        assert_eq!(err.path, dir.path().join("20240315"));
    }
}
