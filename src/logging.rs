//! Log bootstrap: an append-only log file plus stderr.
//!
//! Every line starts with a `YYYYMMDD HH:MM:SS` timestamp. `RUST_LOG`
//! overrides the configured level:
//! ```bash
//! RUST_LOG=debug cfx-sorter watch /mnt/cfx96
//! ```

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::SorterConfig;

/// Local time as `20240315 14:02:11`.
struct LogTime;

impl FormatTime for LogTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y%m%d %H:%M:%S"))
    }
}

fn env_filter(config: &SorterConfig) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(&config.log_level)
    }
}

/// Install the global subscriber for the watched root.
///
/// The returned guard flushes the file writer when dropped; hold it for the
/// lifetime of the process.
pub fn init(config: &SorterConfig, root: &Path) -> anyhow::Result<WorkerGuard> {
    let log_path = config.log_path(root);
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(root);
    let file_name = log_path
        .file_name()
        .with_context(|| format!("log file {} has no file name", log_path.display()))?;

    // `never` rotates nothing and appends to an existing file.
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_timer(LogTime)
        .with_filter(env_filter(config));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(LogTime)
        .with_filter(env_filter(config));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("failed to install log subscriber")?;

    Ok(guard)
}
