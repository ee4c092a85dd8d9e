use std::path::PathBuf;

use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind};

/// A newly created entry directly under the watched root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationEvent {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl CreationEvent {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// Extract creation events from a raw notify event.
///
/// A file renamed or moved into the root counts as created: backends report
/// it either as `Name(To)` carrying the new path, or as `Name(Both)` with
/// the old path first and the new path second. Everything else (plain
/// modify, access, remove, rename-away) yields nothing.
///
/// Backends that cannot tell files from folders report `CreateKind::Any`; the
/// path itself is checked then, as it is for every rename.
pub fn creation_events(event: Event) -> Vec<CreationEvent> {
    let paths: Vec<(PathBuf, Option<bool>)> = match event.kind {
        EventKind::Create(kind) => {
            let known = match kind {
                CreateKind::Folder => Some(true),
                CreateKind::File => Some(false),
                CreateKind::Any | CreateKind::Other => None,
            };
            event.paths.into_iter().map(|p| (p, known)).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            event.paths.into_iter().map(|p| (p, None)).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => event
            .paths
            .into_iter()
            .nth(1)
            .map(|p| (p, None))
            .into_iter()
            .collect(),
        _ => Vec::new(),
    };

    paths
        .into_iter()
        .map(|(path, known)| {
            if known.unwrap_or_else(|| path.is_dir()) {
                CreationEvent::dir(path)
            } else {
                CreationEvent::file(path)
            }
        })
        .collect()
}
