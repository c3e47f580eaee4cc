// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use checkpoint_core::{GlobalDefaults, Project, ProjectId};
use checkpoint_platform::{FakeDaemonManager, FakeNotifyAdapter};
use checkpoint_state::{ProjectRegistry, ProjectState, StateRoot};

use super::*;

fn sample_project(id: ProjectId) -> Project {
    Project {
        id,
        name: "demo".into(),
        root: std::path::PathBuf::from("/tmp/demo"),
        backup_dir: std::path::PathBuf::from("/tmp/demo-backup"),
        cloud_dir: None,
        remote_uri: None,
        drive_marker: None,
        encryption_key_file: None,
        enable_env_capture: false,
        enable_ide_capture: false,
        enable_notes_capture: false,
        enable_ai_artifact_capture: false,
        enable_db_backup: false,
        overrides: GlobalDefaults::default(),
    }
}

#[tokio::test]
async fn project_with_no_heartbeat_yet_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let state_root = StateRoot::new(dir.path());
    let id = ProjectId::new();
    ProjectRegistry::new(state_root.path()).upsert(sample_project(id.clone())).unwrap();

    let watchdog = Watchdog::new(state_root, FakeDaemonManager::new(), FakeNotifyAdapter::new(), None, 4);
    let results = watchdog.check_all().await.unwrap();

    assert_eq!(results, vec![(id, CheckOutcome::NoHeartbeatYet)]);
}

#[tokio::test]
async fn fresh_heartbeat_is_reported_healthy() {
    let dir = tempfile::tempdir().unwrap();
    let state_root = StateRoot::new(dir.path());
    let id = ProjectId::new();
    ProjectRegistry::new(state_root.path()).upsert(sample_project(id.clone())).unwrap();
    ProjectState::new(&state_root, &id).beat_heartbeat().unwrap();

    let watchdog = Watchdog::new(state_root, FakeDaemonManager::new(), FakeNotifyAdapter::new(), None, 4);
    let results = watchdog.check_all().await.unwrap();

    assert_eq!(results, vec![(id, CheckOutcome::Healthy)]);
}

fn write_tight_interval_config(state_root: &StateRoot, id: &ProjectId) {
    let project_dir = state_root.project_dir(id);
    std::fs::create_dir_all(&project_dir).unwrap();
    std::fs::write(
        project_dir.join("config.yaml"),
        "backup_interval_secs: 1\nwatchdog_missed_heartbeats: 1\n",
    )
    .unwrap();
}

#[tokio::test]
async fn stale_heartbeat_triggers_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let state_root = StateRoot::new(dir.path());
    let id = ProjectId::new();
    ProjectRegistry::new(state_root.path()).upsert(sample_project(id.clone())).unwrap();
    write_tight_interval_config(&state_root, &id);

    ProjectState::new(&state_root, &id).beat_heartbeat().unwrap();
    std::thread::sleep(std::time::Duration::from_secs(2));

    let daemon = FakeDaemonManager::new();
    let watchdog = Watchdog::new(state_root, daemon.clone(), FakeNotifyAdapter::new(), None, 4);
    let results = watchdog.check_all().await.unwrap();

    assert_eq!(results, vec![(id, CheckOutcome::Restarted)]);
    assert_eq!(daemon.start_calls(), 1);
}

#[tokio::test]
async fn repeated_restart_failures_send_a_critical_notification() {
    let dir = tempfile::tempdir().unwrap();
    let state_root = StateRoot::new(dir.path());
    let id = ProjectId::new();
    ProjectRegistry::new(state_root.path()).upsert(sample_project(id.clone())).unwrap();
    write_tight_interval_config(&state_root, &id);

    ProjectState::new(&state_root, &id).beat_heartbeat().unwrap();
    std::thread::sleep(std::time::Duration::from_secs(2));

    let daemon = FakeDaemonManager::new();
    daemon.set_start_should_fail(true);
    let notify = FakeNotifyAdapter::new();
    let watchdog = Watchdog::new(state_root, daemon, notify.clone(), None, 4);

    let results = watchdog.check_all().await.unwrap();

    assert_eq!(results, vec![(id, CheckOutcome::RestartFailed)]);
    assert_eq!(notify.calls().len(), 1);
}
