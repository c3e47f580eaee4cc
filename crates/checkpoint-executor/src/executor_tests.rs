// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use checkpoint_core::{GlobalDefaults, Project, ProjectId, TriggerCause};
use checkpoint_platform::FakePlatform;
use checkpoint_state::StateRoot;

use crate::retention_hook::NullRetentionHook;

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
async fn skips_when_nothing_changed_and_not_forced() {
    let project_dir = tempfile::tempdir().unwrap();
    let backup_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();
    std::fs::write(project_dir.path().join("a.txt"), b"hello").unwrap();

    let state_root = StateRoot::new(state_dir.path());
    let project = sample_project(project_dir.path(), backup_dir.path());
    let project_state = checkpoint_state::ProjectState::new(&state_root, &project.id);
    project_state.set_last_backup_time(9_999_999_999).unwrap();

    let platform = FakePlatform::new();
    platform.set_disk_usage_pct(10);
    let hook = NullRetentionHook;

    let record = run(&state_root, &platform, &hook, &project, TriggerCause::Watcher, false).await;

    assert_eq!(record.outcome, BackupOutcome::Skipped);
}

#[tokio::test]
async fn forced_run_backs_up_even_without_detected_changes() {
    let project_dir = tempfile::tempdir().unwrap();
    let backup_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();
    std::fs::write(project_dir.path().join("a.txt"), "x".repeat(400)).unwrap();

    let state_root = StateRoot::new(state_dir.path());
    let project = sample_project(project_dir.path(), backup_dir.path());
    let project_state = checkpoint_state::ProjectState::new(&state_root, &project.id);
    project_state.set_last_backup_time(9_999_999_999).unwrap();

    let platform = FakePlatform::new();
    platform.set_disk_usage_pct(10);
    let hook = NullRetentionHook;

    let record = run(&state_root, &platform, &hook, &project, TriggerCause::Manual, true).await;

    assert_eq!(record.outcome, BackupOutcome::Success);
    assert!(backup_dir.path().join("files/a.txt.gz").exists());
    assert!(record.bytes_written > 0);
}

#[tokio::test]
async fn contended_lock_is_reported_as_a_failed_record_not_a_panic() {
    let project_dir = tempfile::tempdir().unwrap();
    let backup_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();

    let state_root = StateRoot::new(state_dir.path());
    let project = sample_project(project_dir.path(), backup_dir.path());
    let platform = FakePlatform::new();
    let hook = NullRetentionHook;

    let lock_dir = state_root.path().join("locks");
    let held = checkpoint_platform::acquire_lock(&lock_dir, "backup", &platform).unwrap();

    let record = run(&state_root, &platform, &hook, &project, TriggerCause::Watcher, true).await;

    assert_eq!(record.outcome, BackupOutcome::Failed);
    assert!(record.extra.get("error").is_some());
    drop(held);
}

#[tokio::test]
async fn critical_disk_usage_aborts_before_touching_any_artifact() {
    let project_dir = tempfile::tempdir().unwrap();
    let backup_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();
    std::fs::write(project_dir.path().join("a.txt"), b"hello").unwrap();

    let state_root = StateRoot::new(state_dir.path());
    let project = sample_project(project_dir.path(), backup_dir.path());
    let platform = FakePlatform::new();
    platform.set_disk_usage_pct(95);
    let hook = NullRetentionHook;

    let record = run(&state_root, &platform, &hook, &project, TriggerCause::Interval, true).await;

    assert_eq!(record.outcome, BackupOutcome::Failed);
    assert!(!backup_dir.path().join("files").exists());
}
