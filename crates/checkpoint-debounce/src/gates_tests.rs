// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use checkpoint_core::ProjectId;

fn fixture() -> (tempfile::TempDir, StateRoot, ProjectState) {
    let dir = tempfile::tempdir().unwrap();
    let root = StateRoot::new(dir.path());
    let project = ProjectId::new();
    let state = ProjectState::new(&root, &project);
    (dir, root, state)
}

#[test]
fn fails_when_paused() {
    let (_dir, root, state) = fixture();
    root.pause().unwrap();
    let inputs = GateInputs {
        state_root: &root,
        project_state: &state,
        drive_marker: None,
        backup_interval_secs: 3600,
        now_epoch_secs: 10_000,
        bypass_interval: false,
    };
    assert_eq!(evaluate(&inputs), Err(GateFailure::Paused));
}

#[test]
fn fails_when_drive_marker_missing() {
    let (_dir, root, state) = fixture();
    let missing = std::path::PathBuf::from("/nonexistent/marker");
    let inputs = GateInputs {
        state_root: &root,
        project_state: &state,
        drive_marker: Some(&missing),
        backup_interval_secs: 3600,
        now_epoch_secs: 10_000,
        bypass_interval: false,
    };
    assert_eq!(evaluate(&inputs), Err(GateFailure::DriveMarkerMissing));
}

#[test]
fn fails_when_interval_not_elapsed() {
    let (_dir, root, state) = fixture();
    state.set_last_backup_time(9_999).unwrap();
    let inputs = GateInputs {
        state_root: &root,
        project_state: &state,
        drive_marker: None,
        backup_interval_secs: 3600,
        now_epoch_secs: 10_000,
        bypass_interval: false,
    };
    assert_eq!(evaluate(&inputs), Err(GateFailure::IntervalNotElapsed));
}

#[test]
fn bypass_interval_skips_gate_three() {
    let (_dir, root, state) = fixture();
    state.set_last_backup_time(9_999).unwrap();
    let inputs = GateInputs {
        state_root: &root,
        project_state: &state,
        drive_marker: None,
        backup_interval_secs: 3600,
        now_epoch_secs: 10_000,
        bypass_interval: true,
    };
    assert_eq!(evaluate(&inputs), Ok(()));
}

#[test]
fn passes_when_all_clear() {
    let (_dir, root, state) = fixture();
    let inputs = GateInputs {
        state_root: &root,
        project_state: &state,
        drive_marker: None,
        backup_interval_secs: 3600,
        now_epoch_secs: 10_000,
        bypass_interval: false,
    };
    assert_eq!(evaluate(&inputs), Ok(()));
}
