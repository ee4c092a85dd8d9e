use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Files CFX96 exports into date/run/category folders as they appear.
///
/// cfx-sorter watches the instrument's export directory. Files named
/// `<run> - <kind>` are moved to `YYYYMMDD/<run>/RawResults` or
/// `YYYYMMDD/<run>/Misc`; everything else goes to `GeneralMisc`.
#[derive(Parser, Debug)]
#[command(
    name = "cfx-sorter",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch a directory and sort newly created files until interrupted.
    Watch {
        /// Directory the instrument exports into.
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Config file to use instead of `cfx-sorter.toml` in the watched directory.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show where a file name would be sorted to, without touching the disk.
    Classify {
        /// Base name of the exported file.
        name: String,

        /// Watched directory the destination is resolved against.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Day the file is treated as arriving on (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Config file to use instead of `cfx-sorter.toml` in the root.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output the result as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },
}
