//! The patch ledger: per-file ordered queues of not-yet-delivered events.
//!
//! Events are keyed by a per-file monotonically incrementing sequence
//! number, so two changes landing within the same wall-clock millisecond
//! can never overwrite each other. The wall-clock timestamp is carried on
//! each event as an informational field only.
//!
//! The ledger is appended to by the change detector and drained by the
//! delivery API; nothing else mutates it.

use crate::diff::TextPatch;
use patchbay_core::utils::current_timestamp_ms;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// What a ledger event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchAction {
    /// Incremental text change; `patch` carries the edits
    Patch,
    /// The file is gone; payload empty
    Delete,
}

/// One pending change for a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchEvent {
    /// Per-file sequence number, the ledger key
    pub seq: u64,

    /// Wall-clock time the event was recorded, for display only
    pub timestamp_ms: u64,

    pub action: PatchAction,

    /// Present for `Patch` events, `None` for `Delete`
    pub patch: Option<TextPatch>,
}

#[derive(Debug, Default)]
struct FileLedger {
    next_seq: u64,
    pending: BTreeMap<u64, PatchEvent>,
}

impl FileLedger {
    fn allocate_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// All per-file pending-event queues
#[derive(Debug, Default)]
pub struct PatchLedger {
    files: HashMap<PathBuf, FileLedger>,
}

impl PatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or re-create) the entry for a newly observed file.
    ///
    /// Any pending events from a previous life of this path are discarded;
    /// the sequence counter survives so response keys stay monotone.
    pub fn init_entry(&mut self, path: &Path) {
        let entry = self.files.entry(path.to_path_buf()).or_default();
        entry.pending.clear();
    }

    /// Append a `Patch` event at the file's next sequence number.
    pub fn record_patch(&mut self, path: &Path, patch: TextPatch) -> u64 {
        let entry = self.files.entry(path.to_path_buf()).or_default();
        let seq = entry.allocate_seq();
        entry.pending.insert(
            seq,
            PatchEvent {
                seq,
                timestamp_ms: current_timestamp_ms(),
                action: PatchAction::Patch,
                patch: Some(patch),
            },
        );
        seq
    }

    /// Replace the file's pending events with a single `Delete` event.
    ///
    /// The end state "file is gone" supersedes intermediate history, so
    /// earlier undelivered patches are discarded rather than shipped.
    pub fn record_delete(&mut self, path: &Path) -> u64 {
        let entry = self.files.entry(path.to_path_buf()).or_default();
        entry.pending.clear();
        let seq = entry.allocate_seq();
        entry.pending.insert(
            seq,
            PatchEvent {
                seq,
                timestamp_ms: current_timestamp_ms(),
                action: PatchAction::Delete,
                patch: None,
            },
        );
        seq
    }

    /// Consume the pending events for a path, in ascending sequence order.
    ///
    /// Returns `None` when the path has no ledger entry at all. Applies the
    /// drain rule: a drained set consisting of exactly one `Delete` event
    /// removes the entry entirely; otherwise the entry is kept with an
    /// empty queue, ready for future events.
    pub fn drain_pending(&mut self, path: &Path) -> Option<Vec<PatchEvent>> {
        let entry = self.files.get_mut(path)?;
        let events: Vec<PatchEvent> = std::mem::take(&mut entry.pending).into_values().collect();

        if events.len() == 1 && events[0].action == PatchAction::Delete {
            self.files.remove(path);
        }

        Some(events)
    }

    /// Clear the pending events after a fast-forward delivery.
    ///
    /// Returns false when the path has no entry (nothing was cleared).
    pub fn reset_pending(&mut self, path: &Path) -> bool {
        match self.files.get_mut(path) {
            Some(entry) => {
                entry.pending.clear();
                true
            }
            None => false,
        }
    }

    /// Hand out the next sequence number for a synthesized event.
    pub fn allocate_seq(&mut self, path: &Path) -> Option<u64> {
        self.files.get_mut(path).map(|entry| entry.allocate_seq())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Every path currently holding a ledger entry
    pub fn tracked_paths(&self) -> Vec<PathBuf> {
        self.files.keys().cloned().collect()
    }

    pub fn pending_count(&self, path: &Path) -> usize {
        self.files.get(path).map(|e| e.pending.len()).unwrap_or(0)
    }
}
