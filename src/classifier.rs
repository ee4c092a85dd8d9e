use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::SorterConfig;

/// Catch-all directory for files that cannot be tied to a run.
pub const GENERAL_MISC_DIR: &str = "GeneralMisc";
/// Per-run directory for everything that is not a quantification result.
pub const MISC_DIR: &str = "Misc";
/// Per-run directory for quantification result exports.
pub const RAW_RESULTS_DIR: &str = "RawResults";
/// Daily directory naming, e.g. `20240315`.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Which per-run subdirectory a file belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    RawResult,
    Misc,
}

impl Category {
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::RawResult => RAW_RESULTS_DIR,
            Category::Misc => MISC_DIR,
        }
    }
}

/// Where a file belongs, derived purely from its name and the day it arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Classification {
    /// No run title could be extracted; goes to `GeneralMisc`.
    Unclassified,
    /// Part of an exported run, filed under the day it was observed.
    RunFile {
        date: NaiveDate,
        run_title: String,
        category: Category,
    },
}

impl Classification {
    /// Destination directory relative to the watched root.
    pub fn relative_dir(&self) -> PathBuf {
        match self {
            Classification::Unclassified => PathBuf::from(GENERAL_MISC_DIR),
            Classification::RunFile {
                date,
                run_title,
                category,
            } => PathBuf::from(date.format(DATE_FORMAT).to_string())
                .join(run_title)
                .join(category.dir_name()),
        }
    }
}

/// Splits exported file names into run title and category.
#[derive(Debug, Clone)]
pub struct Classifier {
    separator: String,
    raw_result_markers: Vec<String>,
}

impl Classifier {
    pub fn new(separator: impl Into<String>, raw_result_markers: Vec<String>) -> Self {
        Self {
            separator: separator.into(),
            raw_result_markers,
        }
    }

    pub fn from_config(config: &SorterConfig) -> Self {
        Self::new(config.separator.clone(), config.raw_result_markers.clone())
    }

    /// Classify a base file name observed on `today`.
    ///
    /// The run title is everything before the first separator. A padded
    /// separator such as `" - "` already consumes the surrounding spaces, so the
    /// title is used verbatim; a bare `"-"` leaves stray whitespace behind, which
    /// is trimmed. Titles that cannot name a directory (empty, `.`, `..`) make
    /// the file unclassified.
    pub fn classify(&self, file_name: &str, today: NaiveDate) -> Classification {
        let Some((head, _rest)) = file_name.split_once(self.separator.as_str()) else {
            return Classification::Unclassified;
        };

        let run_title = if self.separator.trim() == self.separator {
            head.trim()
        } else {
            head
        };
        if run_title.is_empty() || run_title == "." || run_title == ".." {
            return Classification::Unclassified;
        }

        Classification::RunFile {
            date: today,
            run_title: run_title.to_string(),
            category: self.category_of(file_name),
        }
    }

    fn category_of(&self, file_name: &str) -> Category {
        if self
            .raw_result_markers
            .iter()
            .any(|marker| file_name.contains(marker.as_str()))
        {
            Category::RawResult
        } else {
            Category::Misc
        }
    }
}
