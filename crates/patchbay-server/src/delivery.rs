//! Delivery semantics behind the HTTP handlers.
//!
//! Requesting patches for a file is a consuming read: each successful
//! request observes and clears the then-current pending set. A request
//! that errors performs no ledger mutation.

use crate::error::ServerError;
use crate::types::{PatchListEntry, PatchResponse, WireEvent};
use patchbay_core::path::decompose;
use patchbay_core::utils::current_timestamp_ms;
use patchbay_sync::{PatchAction, PatchLedger, TextPatch};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Serves ledger replays, fast-forwards and the pending-file listing
#[derive(Clone)]
pub struct DeliveryService {
    root: PathBuf,
    ledger: Arc<RwLock<PatchLedger>>,
}

impl DeliveryService {
    pub fn new(root: PathBuf, ledger: Arc<RwLock<PatchLedger>>) -> Self {
        Self { root, ledger }
    }

    /// Handle `POST /patch/{path}`.
    ///
    /// The raw path arrives without its leading slash (stripped by the
    /// route pattern); it addresses the file by absolute path.
    pub async fn patch_for(
        &self,
        raw_path: &str,
        initial: Option<String>,
    ) -> Result<PatchResponse, ServerError> {
        let path = PathBuf::from(format!("/{}", raw_path.trim_start_matches('/')));

        if !self.ledger.read().await.contains(&path) {
            return Err(ServerError::PatchNotFound(path.display().to_string()));
        }

        let address = decompose(&self.root, &path)
            .ok_or_else(|| ServerError::OutOfBounds(path.display().to_string()))?;

        // Fast-forward only applies while the file still exists on disk;
        // otherwise the ledger (typically holding a delete) is replayed.
        let list = match initial {
            Some(baseline) => {
                if is_file(&path).await {
                    self.fast_forward(&path, &baseline).await?
                } else {
                    self.replay(&path).await?
                }
            }
            None => self.replay(&path).await?,
        };

        Ok(PatchResponse {
            file_name: address.stem,
            ext: address.ext,
            parts: address.parts,
            list,
        })
    }

    /// Ledger replay: every pending event, ascending, then the drain rule.
    async fn replay(&self, path: &Path) -> Result<BTreeMap<u64, WireEvent>, ServerError> {
        let mut ledger = self.ledger.write().await;
        let events = ledger
            .drain_pending(path)
            .ok_or_else(|| ServerError::PatchNotFound(path.display().to_string()))?;

        Ok(events
            .into_iter()
            .map(|event| (event.seq, WireEvent::from(event)))
            .collect())
    }

    /// Baseline fast-forward: one synthesized patch from the caller's
    /// baseline to the current on-disk content, bypassing the ledger.
    async fn fast_forward(
        &self,
        path: &Path,
        baseline: &str,
    ) -> Result<BTreeMap<u64, WireEvent>, ServerError> {
        let current = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServerError::Io(format!("{}: {}", path.display(), e)))?;

        let patch = TextPatch::make(baseline, &current);

        let mut ledger = self.ledger.write().await;
        let seq = ledger
            .allocate_seq(path)
            .ok_or_else(|| ServerError::PatchNotFound(path.display().to_string()))?;
        ledger.reset_pending(path);

        let mut list = BTreeMap::new();
        list.insert(
            seq,
            WireEvent {
                action: PatchAction::Patch,
                patch: Some(patch),
                timestamp_ms: current_timestamp_ms(),
            },
        );
        Ok(list)
    }

    /// Handle `GET /patchList`: the structured address of every path with a
    /// ledger entry. Paths failing the boundary check are skipped, never an
    /// error.
    pub async fn patch_list(&self) -> Vec<PatchListEntry> {
        let ledger = self.ledger.read().await;
        let mut paths = ledger.tracked_paths();
        paths.sort();

        paths
            .iter()
            .filter_map(|path| {
                decompose(&self.root, path).map(|addr| PatchListEntry {
                    path: path.display().to_string(),
                    file_name: addr.stem,
                    ext: addr.ext,
                    parts: addr.parts,
                })
            })
            .collect()
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
