mod activity;
mod artifacts;
mod classifier;
mod cli;
mod config;
mod dispatch;
mod error;
mod logging;
mod provision;
mod relocate;
mod watcher;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use activity::{ActivityLog, TracingActivityLog};
use cli::{Cli, Commands};
use config::SorterConfig;
use dispatch::Dispatcher;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch { path, config } => watch(&path, config.as_deref()).await,
        Commands::Classify {
            name,
            root,
            date,
            config,
            json,
        } => classify(&name, &root, date, config.as_deref(), json),
    }
}

fn watched_root(path: &Path) -> Result<PathBuf> {
    let root = path
        .canonicalize()
        .with_context(|| format!("cannot open watched directory {}", path.display()))?;
    anyhow::ensure!(root.is_dir(), "{} is not a directory", root.display());
    Ok(root)
}

async fn watch(path: &Path, config_path: Option<&Path>) -> Result<()> {
    let root = watched_root(path)?;
    let config = SorterConfig::resolve(&root, config_path)?;
    let _log_guard = logging::init(&config, &root)?;

    let log: Arc<dyn ActivityLog> = Arc::new(TracingActivityLog);
    let dispatcher = Dispatcher::from_config(&root, &config, log.clone())?;
    let (_handle, events) = watcher::start_watcher(dispatcher.root(), log)?;

    println!(
        "Started monitoring {} for exported runs",
        dispatcher.root().display()
    );
    tracing::info!("Watching {}", dispatcher.root().display());

    tokio::select! {
        _ = dispatcher.run(events) => {
            tracing::warn!("watch event stream ended");
        }
        res = tokio::signal::ctrl_c() => {
            res.context("failed to listen for ctrl-c")?;
            tracing::info!("Stopped watching {}", dispatcher.root().display());
        }
    }

    Ok(())
}

fn classify(
    name: &str,
    root: &Path,
    date: Option<NaiveDate>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = SorterConfig::resolve(root, config_path)?;
    let today = date.unwrap_or_else(|| chrono::Local::now().date_naive());

    match dispatch::preview(root, &config, name, today)? {
        Some((classification, target)) => {
            if json {
                let out = serde_json::json!({
                    "file": name,
                    "classification": classification,
                    "destination": target,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", target.display());
            }
        }
        None => {
            if json {
                println!("{}", serde_json::json!({ "file": name, "ignored": true }));
            } else {
                println!("ignored");
            }
        }
    }

    Ok(())
}
