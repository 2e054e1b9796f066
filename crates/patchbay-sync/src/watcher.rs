//! Filesystem watcher feeding the change detector.
//!
//! Wraps a [`notify::RecommendedWatcher`] and forwards simplified events
//! over a tokio channel. Hidden (dot-prefixed) paths are filtered out
//! before they reach the detector, and raw watch errors are logged and
//! dropped rather than tearing the pipeline down.

use crate::SyncResult;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Component, Path, PathBuf};
use tokio::sync::mpsc;

/// Simplified lifecycle event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchKind {
    Created,
    Modified,
    Removed,
}

/// A single simplified filesystem event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: WatchKind,
    pub path: PathBuf,
}

/// Recursive watcher over the configured root directory
pub struct FsWatcher {
    watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FsWatcher {
    /// Create a watcher rooted at `root`.
    ///
    /// Returns the watcher together with the receiving end of the event
    /// channel. Watching does not start until [`FsWatcher::watch`] is
    /// called.
    pub fn new(
        root: PathBuf,
        ignore_hidden: bool,
    ) -> SyncResult<(Self, mpsc::UnboundedReceiver<WatchEvent>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let filter_root = root.clone();

        let watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    let kind = match event.kind {
                        EventKind::Create(_) => WatchKind::Created,
                        EventKind::Modify(_) => WatchKind::Modified,
                        EventKind::Remove(_) => WatchKind::Removed,
                        _ => return,
                    };

                    for path in event.paths {
                        if ignore_hidden && is_hidden(&filter_root, &path) {
                            continue;
                        }
                        let _ = tx.send(WatchEvent { kind, path });
                    }
                }
                Err(e) => tracing::warn!("filesystem watch error: {}", e),
            },
            Config::default(),
        )?;

        Ok((Self { watcher, root }, rx))
    }

    /// Start watching the root recursively.
    pub fn watch(&mut self) -> SyncResult<()> {
        self.watcher.watch(&self.root, RecursiveMode::Recursive)?;
        Ok(())
    }

    /// Stop watching the root.
    pub fn unwatch(&mut self) -> SyncResult<()> {
        self.watcher.unwatch(&self.root)?;
        Ok(())
    }
}

/// True when any path component below `root` is dot-prefixed.
pub fn is_hidden(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components().any(|c| match c {
        Component::Normal(seg) => seg.to_string_lossy().starts_with('.'),
        _ => false,
    })
}
