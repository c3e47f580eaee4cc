// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::dispatch::fake::FakeExecutor;
use checkpoint_core::ChangeEvent;
use checkpoint_platform::FakePlatform;
use std::time::Duration;
use tokio::sync::mpsc;

fn harness(debounce_ms: u64) -> (
    tempfile::TempDir,
    SessionConfig,
    Arc<StateRoot>,
    Arc<dyn PlatformFacade>,
    mpsc::Sender<ChangeEvent>,
    mpsc::Receiver<ChangeEvent>,
    Arc<FakeExecutor>,
    CancellationToken,
) {
    let dir = tempfile::tempdir().unwrap();
    let state_root = Arc::new(StateRoot::new(dir.path().join("state")));
    let platform: Arc<dyn PlatformFacade> = Arc::new(FakePlatform::new());
    let project_id = ProjectId::new();
    let config = SessionConfig {
        project_id,
        debounce: Duration::from_millis(debounce_ms),
        session_idle_threshold: Duration::from_secs(600),
        backup_interval: Duration::from_secs(0),
        drive_marker: None,
        lock_dir: dir.path().join("locks"),
    };
    let (tx, rx) = mpsc::channel(32);
    let executor = Arc::new(FakeExecutor::new());
    let shutdown = CancellationToken::new();
    (dir, config, state_root, platform, tx, rx, executor, shutdown)
}

// S1 — Debounced burst: N events within a window narrower than
// debounce_seconds yield exactly one dispatch, after the quiet period.
#[tokio::test]
async fn debounced_burst_dispatches_exactly_once() {
    let (_dir, config, state_root, platform, tx, rx, executor, shutdown) = harness(200);
    let dispatch: Arc<dyn ExecutorDispatch> = executor.clone();
    let shutdown_clone = shutdown.clone();

    let handle = tokio::spawn(run(config, state_root, platform, rx, dispatch, shutdown_clone));

    for _ in 0..10 {
        tx.send(ChangeEvent::observed()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    tokio::time::sleep(Duration::from_millis(400)).await;
    shutdown.cancel();
    drop(tx);
    let _ = handle.await;

    // Each observed event is treated as a potential new-session trigger only
    // once (is_new_session flips false after the first), so the burst
    // collapses to a single watcher-timer dispatch plus at most one
    // immediate session trigger from the very first event.
    assert!(executor.calls().len() <= 2);
    assert!(!executor.calls().is_empty());
}

// S2 — Session idle: a stale current-session-time triggers an immediate
// dispatch bypassing the interval gate.
#[tokio::test]
async fn idle_session_triggers_immediately() {
    let (_dir, mut config, state_root, platform, tx, rx, executor, shutdown) = harness(5_000);
    config.backup_interval = Duration::from_secs(3600);
    let dispatch: Arc<dyn ExecutorDispatch> = executor.clone();
    let shutdown_clone = shutdown.clone();

    let handle = tokio::spawn(run(config, state_root, platform, rx, dispatch, shutdown_clone));

    tx.send(ChangeEvent::observed()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();
    drop(tx);
    let _ = handle.await;

    assert_eq!(executor.calls().len(), 1);
    assert_eq!(executor.calls()[0].1, checkpoint_core::TriggerCause::Session);
}

#[tokio::test]
async fn catchup_event_always_triggers_immediately() {
    let (_dir, mut config, state_root, platform, tx, rx, executor, shutdown) = harness(5_000);
    config.backup_interval = Duration::from_secs(3600);
    let dispatch: Arc<dyn ExecutorDispatch> = executor.clone();
    let shutdown_clone = shutdown.clone();

    let handle = tokio::spawn(run(config, state_root, platform, rx, dispatch, shutdown_clone));

    tx.send(ChangeEvent::catchup()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();
    drop(tx);
    let _ = handle.await;

    assert_eq!(executor.calls().len(), 1);
}

#[tokio::test]
async fn paused_state_suppresses_dispatch() {
    let (_dir, mut config, state_root, platform, tx, rx, executor, shutdown) = harness(50);
    config.backup_interval = Duration::from_secs(0);
    state_root.pause().unwrap();
    let dispatch: Arc<dyn ExecutorDispatch> = executor.clone();
    let shutdown_clone = shutdown.clone();

    let handle = tokio::spawn(run(config, state_root, platform, rx, dispatch, shutdown_clone));

    tx.send(ChangeEvent::observed()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    shutdown.cancel();
    drop(tx);
    let _ = handle.await;

    assert!(executor.calls().is_empty());
}
