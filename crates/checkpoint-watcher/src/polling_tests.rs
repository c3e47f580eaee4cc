// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::PollingWatcher;
use crate::backend::WatcherBackend;
use crate::exclude::ExclusionSet;
use checkpoint_core::WatcherBackendKind;
use std::path::PathBuf;
use std::time::Duration;

#[tokio::test]
async fn emits_catchup_event_first() {
    let dir = tempfile::tempdir().unwrap();
    let watcher = Box::new(PollingWatcher::new(Duration::from_millis(50)));
    let mut events =
        watcher.watch(dir.path().to_path_buf(), ExclusionSet::new(&[], None)).await.unwrap();
    let first = tokio::time::timeout(Duration::from_secs(2), events.recv()).await.unwrap();
    assert!(first.unwrap().is_catchup());
}

#[tokio::test]
async fn detects_a_new_file_on_next_poll() {
    let dir = tempfile::tempdir().unwrap();
    let watcher = Box::new(PollingWatcher::new(Duration::from_millis(50)));
    let mut events =
        watcher.watch(dir.path().to_path_buf(), ExclusionSet::new(&[], None)).await.unwrap();
    let _ = tokio::time::timeout(Duration::from_secs(2), events.recv()).await;

    std::fs::write(dir.path().join("changed.txt"), b"hi").unwrap();

    let observed = tokio::time::timeout(Duration::from_secs(2), events.recv()).await;
    assert!(observed.is_ok());
    assert!(!observed.unwrap().unwrap().is_catchup());
}

#[tokio::test]
async fn ignores_changes_under_excluded_directories() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("node_modules")).unwrap();
    let watcher = Box::new(PollingWatcher::new(Duration::from_millis(50)));
    let mut events =
        watcher.watch(dir.path().to_path_buf(), ExclusionSet::new(&[], None)).await.unwrap();
    let _ = tokio::time::timeout(Duration::from_secs(2), events.recv()).await;

    std::fs::write(dir.path().join("node_modules").join("ignored.js"), b"x").unwrap();

    let observed = tokio::time::timeout(Duration::from_millis(300), events.recv()).await;
    assert!(observed.is_err(), "excluded path should not produce a change event");
}

#[tokio::test]
async fn watch_reports_polling_kind() {
    let watcher = PollingWatcher::new(Duration::from_secs(30));
    assert_eq!(watcher.kind(), WatcherBackendKind::Polling);
}

#[tokio::test]
async fn errors_on_missing_root() {
    let watcher = Box::new(PollingWatcher::new(Duration::from_secs(30)));
    let result = watcher.watch(PathBuf::from("/does/not/exist"), ExclusionSet::new(&[], None)).await;
    assert!(result.is_err());
}
