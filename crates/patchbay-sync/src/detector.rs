//! The change detector: turns raw filesystem events into snapshot updates
//! and ledger events.
//!
//! Each event is processed to completion under the shared locks before the
//! next one is taken, preserving the run-to-completion semantics the ledger
//! invariants rely on. Detector-side I/O failures are absorbed locally and
//! converted to delete handling; they are never surfaced to a caller.

use crate::diff::TextPatch;
use crate::ledger::PatchLedger;
use crate::snapshot::SnapshotStore;
use crate::watcher::{is_hidden, WatchEvent, WatchKind};
use crate::SyncResult;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Consumes watch events and maintains the snapshot store and patch ledger
pub struct ChangeDetector {
    root: PathBuf,
    snapshots: Arc<RwLock<SnapshotStore>>,
    ledger: Arc<RwLock<PatchLedger>>,
}

impl ChangeDetector {
    pub fn new(
        root: PathBuf,
        snapshots: Arc<RwLock<SnapshotStore>>,
        ledger: Arc<RwLock<PatchLedger>>,
    ) -> Self {
        Self {
            root,
            snapshots,
            ledger,
        }
    }

    /// Seed snapshots and empty ledger entries for every file already under
    /// the root, skipping hidden entries. Returns the number of tracked
    /// files.
    ///
    /// notify does not replay pre-existing files as create events, so the
    /// initial state has to be scanned explicitly.
    pub async fn seed_existing(&self) -> SyncResult<usize> {
        let mut stack = vec![self.root.clone()];

        while let Some(dir) = stack.pop() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("cannot list {}: {}", dir.display(), e);
                    continue;
                }
            };

            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if is_hidden(&self.root, &path) {
                    continue;
                }

                match entry.file_type() {
                    Ok(ft) if ft.is_dir() => stack.push(path),
                    Ok(ft) if ft.is_file() => self.on_created(&path).await,
                    _ => {}
                }
            }
        }

        Ok(self.ledger.read().await.tracked_paths().len())
    }

    /// Run the event loop until the watcher side of the channel closes.
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<WatchEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        tracing::debug!("watch channel closed, change detector stopping");
    }

    /// Process one filesystem event to completion.
    pub async fn handle_event(&self, event: WatchEvent) {
        match event.kind {
            WatchKind::Created => self.on_created(&event.path).await,
            WatchKind::Modified => self.on_modified(&event.path).await,
            WatchKind::Removed => self.on_removed(&event.path).await,
        }
    }

    async fn on_created(&self, path: &Path) {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                tracing::info!("file added: {}", path.display());

                let mut snapshots = self.snapshots.write().await;
                let mut ledger = self.ledger.write().await;
                snapshots.insert(path, contents);
                ledger.init_entry(path);
            }
            // Directories and non-text files are not tracked
            Err(e) => {
                tracing::debug!("skipping unreadable path {}: {}", path.display(), e);
            }
        }
    }

    async fn on_modified(&self, path: &Path) {
        // Some watch backends report modifications for paths that are
        // already gone (rename-over-delete races). Re-verify existence by
        // listing the containing directory before trusting the event.
        if !basename_present(path) {
            self.on_removed(path).await;
            return;
        }

        let new_contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) => {
                if path.is_dir() {
                    return;
                }
                // Removed between the notification and the read
                tracing::debug!("read failed for {}: {}", path.display(), e);
                self.on_removed(path).await;
                return;
            }
        };

        tracing::info!("file changed: {}", path.display());

        let mut snapshots = self.snapshots.write().await;
        let mut ledger = self.ledger.write().await;

        let old_contents = snapshots.get(path).unwrap_or_default().to_string();
        let patch = TextPatch::make(&old_contents, &new_contents);
        ledger.record_patch(path, patch);
        snapshots.insert(path, new_contents);
    }

    async fn on_removed(&self, path: &Path) {
        let mut snapshots = self.snapshots.write().await;
        let mut ledger = self.ledger.write().await;

        // Directory removals and never-tracked paths carry no state to clear
        if !ledger.contains(path) && !snapshots.contains(path) {
            return;
        }

        tracing::info!("file deleted: {}", path.display());
        ledger.record_delete(path);
        snapshots.remove(path);
    }
}

/// Check whether a path's basename is present in its containing directory.
///
/// This is the explicit stale-modify disambiguation step: a listing, not a
/// stat, so the answer reflects what the directory currently claims to
/// contain.
fn basename_present(path: &Path) -> bool {
    let (Some(dir), Some(name)) = (path.parent(), path.file_name()) else {
        return false;
    };

    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().as_os_str() == name),
        Err(_) => false,
    }
}
