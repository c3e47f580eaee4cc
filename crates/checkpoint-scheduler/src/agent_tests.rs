// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use checkpoint_core::{GlobalDefaults, Project, ProjectId};
use checkpoint_executor::NullRetentionHook;
use checkpoint_platform::FakePlatform;
use checkpoint_state::StateRoot;

use super::*;

fn sample_project(root: &std::path::Path, backup_dir: &std::path::Path) -> Project {
    Project {
        id: ProjectId::new(),
        name: "sample".into(),
        root: root.to_path_buf(),
        backup_dir: backup_dir.to_path_buf(),
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
async fn paused_state_gates_the_tick_without_invoking_the_executor() {
    let project_dir = tempfile::tempdir().unwrap();
    let backup_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();

    let state_root = StateRoot::new(state_dir.path());
    state_root.pause().unwrap();
    let project = sample_project(project_dir.path(), backup_dir.path());

    let platform = FakePlatform::new();
    let hook = NullRetentionHook;

    let result = tick(&state_root, &platform, &hook, &project).await;

    assert_eq!(result, Err(GateFailure::Paused));
    assert!(!backup_dir.path().join("files").exists());
}

#[tokio::test]
async fn interval_not_elapsed_gates_the_tick() {
    let project_dir = tempfile::tempdir().unwrap();
    let backup_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();

    let state_root = StateRoot::new(state_dir.path());
    let mut project = sample_project(project_dir.path(), backup_dir.path());
    project.overrides.backup_interval_secs = 3600;

    let project_state = ProjectState::new(&state_root, &project.id);
    project_state.set_last_backup_time(now_epoch_secs()).unwrap();

    let platform = FakePlatform::new();
    let hook = NullRetentionHook;

    let result = tick(&state_root, &platform, &hook, &project).await;

    assert_eq!(result, Err(GateFailure::IntervalNotElapsed));
}

#[tokio::test]
async fn clear_gates_invoke_the_executor_and_report_the_record() {
    let project_dir = tempfile::tempdir().unwrap();
    let backup_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();
    std::fs::write(project_dir.path().join("a.txt"), "x".repeat(400)).unwrap();

    let state_root = StateRoot::new(state_dir.path());
    let mut project = sample_project(project_dir.path(), backup_dir.path());
    project.overrides.backup_interval_secs = 0;

    let platform = FakePlatform::new();
    platform.set_disk_usage_pct(10);
    let hook = NullRetentionHook;

    let result = tick(&state_root, &platform, &hook, &project).await;

    let record = result.unwrap().expect("executor ran");
    assert_eq!(record.cause, TriggerCause::Interval);
}

#[tokio::test]
async fn heartbeat_is_refreshed_across_a_tick() {
    let project_dir = tempfile::tempdir().unwrap();
    let backup_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();

    let state_root = StateRoot::new(state_dir.path());
    let mut project = sample_project(project_dir.path(), backup_dir.path());
    project.overrides.backup_interval_secs = 0;
    let project_state = ProjectState::new(&state_root, &project.id);

    assert!(project_state.heartbeat_age_secs(now_epoch_secs()).is_none());

    let platform = FakePlatform::new();
    let hook = NullRetentionHook;
    let _ = tick(&state_root, &platform, &hook, &project).await;

    assert!(project_state.heartbeat_age_secs(now_epoch_secs()).is_some());
}
