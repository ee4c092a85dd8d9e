pub mod event;

use std::path::Path;
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as tokio_mpsc;
use tokio::task::JoinHandle;

use crate::activity::{Activity, ActivityLog};
use crate::error::WatchError;
use event::{CreationEvent, creation_events};

/// Handle to a running watcher. Keeps the OS watcher alive (dropping stops watching).
pub struct WatcherHandle {
    /// Keep alive: dropping the watcher stops the OS subscription.
    _watcher: RecommendedWatcher,
    /// The bridge task forwarding events from std channel to tokio channel.
    _bridge_task: JoinHandle<()>,
}

/// Start a non-recursive watcher on `watch_root`.
///
/// Returns a `WatcherHandle` (must be kept alive) and a tokio mpsc receiver
/// that yields one `CreationEvent` per created entry, in arrival order.
/// Only direct children of the root are reported; the run hierarchy below it
/// is never watched. Backend errors are reported to `log` and do not stop
/// the watch.
pub fn start_watcher(
    watch_root: &Path,
    log: Arc<dyn ActivityLog>,
) -> Result<(WatcherHandle, tokio_mpsc::Receiver<CreationEvent>), WatchError> {
    let (std_tx, std_rx) = std::sync::mpsc::channel::<notify::Result<notify::Event>>();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let _ = std_tx.send(res);
    })?;
    watcher
        .watch(watch_root, RecursiveMode::NonRecursive)
        .map_err(|err| WatchError::PathWatch {
            path: watch_root.to_path_buf(),
            reason: err.to_string(),
        })?;

    let (tokio_tx, tokio_rx) = tokio_mpsc::channel::<CreationEvent>(256);

    // Bridge: spawn_blocking to receive from std channel, filter creates, forward to tokio
    let bridge_task = tokio::task::spawn_blocking(move || {
        while let Ok(result) = std_rx.recv() {
            match result {
                Ok(event) => {
                    for creation in creation_events(event) {
                        if tokio_tx.blocking_send(creation).is_err() {
                            return; // receiver dropped, shutdown
                        }
                    }
                }
                Err(err) => {
                    log.record(&Activity::WatchFailed {
                        reason: err.to_string(),
                    });
                }
            }
        }
    });

    Ok((
        WatcherHandle {
            _watcher: watcher,
            _bridge_task: bridge_task,
        },
        tokio_rx,
    ))
}
