//! End-to-end change tracking through the detector, snapshot store and
//! ledger, without the HTTP layer.

use patchbay_sync::{
    ChangeDetector, PatchAction, PatchLedger, SnapshotStore, WatchEvent, WatchKind,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::RwLock;

struct Harness {
    _dir: TempDir,
    root: std::path::PathBuf,
    detector: ChangeDetector,
    ledger: Arc<RwLock<PatchLedger>>,
}

fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    let snapshots = Arc::new(RwLock::new(SnapshotStore::new()));
    let ledger = Arc::new(RwLock::new(PatchLedger::new()));
    let detector = ChangeDetector::new(root.clone(), Arc::clone(&snapshots), Arc::clone(&ledger));

    Harness {
        _dir: dir,
        root,
        detector,
        ledger,
    }
}

async fn fire(h: &Harness, kind: WatchKind, path: &Path) {
    h.detector
        .handle_event(WatchEvent {
            kind,
            path: path.to_path_buf(),
        })
        .await;
}

#[tokio::test]
async fn edit_history_replays_onto_original_content() {
    let h = harness();
    let path = h.root.join("a.lua");

    std::fs::write(&path, "local x = 1\n").unwrap();
    fire(&h, WatchKind::Created, &path).await;

    std::fs::write(&path, "local x = 1\nlocal y = 2\n").unwrap();
    fire(&h, WatchKind::Modified, &path).await;

    std::fs::write(&path, "local x = 1\nlocal y = 2\nreturn x + y\n").unwrap();
    fire(&h, WatchKind::Modified, &path).await;

    let events = h.ledger.write().await.drain_pending(&path).unwrap();
    assert_eq!(events.len(), 2);

    // Applying the drained patches in sequence reconstructs the final text
    let mut text = "local x = 1\n".to_string();
    for event in &events {
        text = event.patch.as_ref().unwrap().apply(&text).unwrap();
    }
    assert_eq!(text, "local x = 1\nlocal y = 2\nreturn x + y\n");
}

#[tokio::test]
async fn create_after_consumed_delete_starts_a_fresh_entry() {
    let h = harness();
    let path = h.root.join("a.lua");

    std::fs::write(&path, "one\n").unwrap();
    fire(&h, WatchKind::Created, &path).await;
    std::fs::remove_file(&path).unwrap();
    fire(&h, WatchKind::Removed, &path).await;

    // Consume the delete; the entry disappears
    let events = h.ledger.write().await.drain_pending(&path).unwrap();
    assert_eq!(events[0].action, PatchAction::Delete);
    assert!(!h.ledger.read().await.contains(&path));

    // A re-created file is tracked again from its new content
    std::fs::write(&path, "two\n").unwrap();
    fire(&h, WatchKind::Created, &path).await;
    assert!(h.ledger.read().await.contains(&path));
    assert_eq!(h.ledger.read().await.pending_count(&path), 0);

    std::fs::write(&path, "two\nthree\n").unwrap();
    fire(&h, WatchKind::Modified, &path).await;

    let events = h.ledger.write().await.drain_pending(&path).unwrap();
    assert_eq!(events.len(), 1);
    let patch = events[0].patch.as_ref().unwrap();
    assert_eq!(patch.apply("two\n").unwrap(), "two\nthree\n");
}

#[tokio::test]
async fn unconsumed_delete_supersedes_edit_history() {
    let h = harness();
    let path = h.root.join("b.lua");

    std::fs::write(&path, "alpha\n").unwrap();
    fire(&h, WatchKind::Created, &path).await;

    for step in ["alpha\nbeta\n", "alpha\nbeta\ngamma\n"] {
        std::fs::write(&path, step).unwrap();
        fire(&h, WatchKind::Modified, &path).await;
    }

    std::fs::remove_file(&path).unwrap();
    fire(&h, WatchKind::Removed, &path).await;

    let events = h.ledger.write().await.drain_pending(&path).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, PatchAction::Delete);
    assert!(events[0].patch.is_none());
}
