// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use checkpoint_platform::FakePlatform;
use checkpoint_state::StateRoot;

use super::*;

fn thresholds() -> PreflightThresholds {
    PreflightThresholds { warn_pct: 80, block_pct: 90 }
}

#[test]
fn paused_project_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let state_root = StateRoot::new(dir.path());
    state_root.pause().unwrap();
    let platform = FakePlatform::new();

    let err = run(&state_root, false, None, dir.path(), thresholds(), &platform).unwrap_err();
    assert!(matches!(err, ExecutorError::Paused));
}

#[test]
fn missing_drive_marker_blocks_when_verification_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let state_root = StateRoot::new(dir.path());
    let marker = dir.path().join("DRIVE_MARKER");
    let platform = FakePlatform::new();

    let err = run(&state_root, true, Some(&marker), dir.path(), thresholds(), &platform).unwrap_err();
    assert!(matches!(err, ExecutorError::DriveMarkerMissing));
}

#[test]
fn present_drive_marker_passes() {
    let dir = tempfile::tempdir().unwrap();
    let state_root = StateRoot::new(dir.path());
    let marker = dir.path().join("DRIVE_MARKER");
    std::fs::write(&marker, b"").unwrap();
    let platform = FakePlatform::new();
    platform.set_disk_usage_pct(10);

    run(&state_root, true, Some(&marker), dir.path(), thresholds(), &platform).unwrap();
}

#[test]
fn disk_usage_at_or_above_block_threshold_fails() {
    let dir = tempfile::tempdir().unwrap();
    let state_root = StateRoot::new(dir.path());
    let platform = FakePlatform::new();
    platform.set_disk_usage_pct(95);

    let err = run(&state_root, false, None, dir.path(), thresholds(), &platform).unwrap_err();
    assert!(matches!(err, ExecutorError::DiskCritical { pct: 95 }));
}

#[test]
fn disk_usage_between_warn_and_block_succeeds_with_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let state_root = StateRoot::new(dir.path());
    let platform = FakePlatform::new();
    platform.set_disk_usage_pct(85);

    run(&state_root, false, None, dir.path(), thresholds(), &platform).unwrap();
}
