// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::NativeWatcher;
use crate::backend::WatcherBackend;
use crate::exclude::ExclusionSet;
use checkpoint_core::WatcherBackendKind;
use std::time::Duration;

#[tokio::test]
async fn emits_synthetic_catchup_event_first() {
    let dir = tempfile::tempdir().unwrap();
    let watcher = Box::new(NativeWatcher::new(WatcherBackendKind::NativeInotifyStyle));
    let mut events = watcher.watch(dir.path().to_path_buf(), ExclusionSet::new(&[], None)).await.unwrap();
    let first = tokio::time::timeout(Duration::from_secs(5), events.recv()).await.unwrap();
    assert!(first.unwrap().is_catchup());
}

#[tokio::test]
async fn reports_declared_kind() {
    let watcher = NativeWatcher::new(WatcherBackendKind::NativeKqueueStyle);
    assert_eq!(watcher.kind(), WatcherBackendKind::NativeKqueueStyle);
}

#[tokio::test]
async fn observes_a_new_file_under_the_root() {
    let dir = tempfile::tempdir().unwrap();
    let watcher = Box::new(NativeWatcher::new(WatcherBackendKind::NativeInotifyStyle));
    let mut events = watcher.watch(dir.path().to_path_buf(), ExclusionSet::new(&[], None)).await.unwrap();
    // Drain the synthetic catch-up event.
    let _ = tokio::time::timeout(Duration::from_secs(5), events.recv()).await;

    std::fs::write(dir.path().join("new-file.txt"), b"hi").unwrap();

    let observed = tokio::time::timeout(Duration::from_secs(5), events.recv()).await;
    assert!(observed.is_ok(), "expected a change event after writing a file");
}
