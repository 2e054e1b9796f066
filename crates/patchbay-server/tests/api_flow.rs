//! End-to-end delivery flow: filesystem events through the change detector,
//! served back out through the delivery service.

use patchbay_server::{DeliveryService, ServerError};
use patchbay_sync::{
    ChangeDetector, PatchAction, PatchLedger, SnapshotStore, WatchEvent, WatchKind,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::RwLock;

struct App {
    _dir: TempDir,
    root: PathBuf,
    detector: ChangeDetector,
    delivery: DeliveryService,
}

fn app() -> App {
    let dir = TempDir::new().unwrap();
    let root = dir.path().to_path_buf();
    let snapshots = Arc::new(RwLock::new(SnapshotStore::new()));
    let ledger = Arc::new(RwLock::new(PatchLedger::new()));
    let detector = ChangeDetector::new(root.clone(), Arc::clone(&snapshots), Arc::clone(&ledger));
    let delivery = DeliveryService::new(root.clone(), ledger);

    App {
        _dir: dir,
        root,
        detector,
        delivery,
    }
}

async fn fire(app: &App, kind: WatchKind, path: &Path) {
    app.detector
        .handle_event(WatchEvent {
            kind,
            path: path.to_path_buf(),
        })
        .await;
}

fn raw(path: &Path) -> String {
    path.to_string_lossy().trim_start_matches('/').to_string()
}

#[tokio::test]
async fn edit_then_request_then_reset() {
    let app = app();
    let path = app.root.join("src").join("a.lua");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();

    // File created with content "a": snapshot set, ledger empty
    std::fs::write(&path, "a").unwrap();
    fire(&app, WatchKind::Created, &path).await;

    // Edited to "ab": one pending patch event
    std::fs::write(&path, "ab").unwrap();
    fire(&app, WatchKind::Modified, &path).await;

    let response = app.delivery.patch_for(&raw(&path), None).await.unwrap();
    assert_eq!(response.file_name, "a");
    assert_eq!(response.ext, ".lua");
    assert_eq!(response.parts, vec!["src".to_string()]);
    assert_eq!(response.list.len(), 1);

    let event = response.list.values().next().unwrap();
    assert_eq!(event.action, PatchAction::Patch);
    assert_eq!(event.patch.as_ref().unwrap().apply("a").unwrap(), "ab");

    // The request consumed the ledger
    let response = app.delivery.patch_for(&raw(&path), None).await.unwrap();
    assert!(response.list.is_empty());
}

#[tokio::test]
async fn wire_shape_matches_consumer_contract() {
    let app = app();
    let path = app.root.join("init.server.lua");

    std::fs::write(&path, "print(1)\n").unwrap();
    fire(&app, WatchKind::Created, &path).await;
    std::fs::write(&path, "print(2)\n").unwrap();
    fire(&app, WatchKind::Modified, &path).await;

    let response = app.delivery.patch_for(&raw(&path), None).await.unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["fileName"], "init");
    assert_eq!(json["ext"], ".server.lua");
    assert!(json["parts"].as_array().unwrap().is_empty());

    let list = json["list"].as_object().unwrap();
    assert_eq!(list.len(), 1);
    for (key, event) in list {
        assert!(key.parse::<u64>().is_ok());
        assert_eq!(event["action"], "patch");
        assert!(event["patch"].is_object());
        assert!(event["timestampMs"].as_u64().unwrap() > 0);
    }
}

#[tokio::test]
async fn deleted_file_vanishes_after_consumption() {
    let app = app();
    let path = app.root.join("gone.lua");

    std::fs::write(&path, "x").unwrap();
    fire(&app, WatchKind::Created, &path).await;

    assert_eq!(app.delivery.patch_list().await.len(), 1);

    std::fs::remove_file(&path).unwrap();
    fire(&app, WatchKind::Removed, &path).await;

    let response = app.delivery.patch_for(&raw(&path), None).await.unwrap();
    assert_eq!(
        response.list.values().next().unwrap().action,
        PatchAction::Delete
    );

    // Entry fully removed: later requests 404 and the listing is empty
    assert!(matches!(
        app.delivery.patch_for(&raw(&path), None).await,
        Err(ServerError::PatchNotFound(_))
    ));
    assert!(app.delivery.patch_list().await.is_empty());
}

#[tokio::test]
async fn fast_forward_skips_interim_history() {
    let app = app();
    let path = app.root.join("big.lua");

    std::fs::write(&path, "r1\n").unwrap();
    fire(&app, WatchKind::Created, &path).await;

    // Many interim edits accumulate
    let mut content = String::from("r1\n");
    for i in 2..=20 {
        content.push_str(&format!("r{}\n", i));
        std::fs::write(&path, &content).unwrap();
        fire(&app, WatchKind::Modified, &path).await;
    }

    // A newly connecting consumer catches up in one step from its baseline
    let response = app
        .delivery
        .patch_for(&raw(&path), Some("r1\n".to_string()))
        .await
        .unwrap();

    assert_eq!(response.list.len(), 1);
    let event = response.list.values().next().unwrap();
    assert_eq!(event.patch.as_ref().unwrap().apply("r1\n").unwrap(), content);
}

#[tokio::test]
async fn out_of_tree_request_is_rejected() {
    let app = app();

    // Nothing tracked at all: not found wins
    assert!(matches!(
        app.delivery.patch_for("etc/passwd", None).await,
        Err(ServerError::PatchNotFound(_))
    ));
}
