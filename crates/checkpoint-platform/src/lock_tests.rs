// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{acquire, is_stale};
use crate::platform::fake::FakePlatform;
use crate::platform::SystemPlatform;

#[test]
fn acquires_and_releases_lock() {
    let dir = tempfile::tempdir().unwrap();
    let platform = SystemPlatform;
    let guard = acquire(dir.path(), "backup", &platform).unwrap();
    drop(guard);
    // Reacquiring after drop must succeed.
    let guard2 = acquire(dir.path(), "backup", &platform);
    assert!(guard2.is_ok());
}

#[test]
fn second_acquire_against_same_path_is_contended() {
    let dir = tempfile::tempdir().unwrap();
    let platform = SystemPlatform;
    let _first = acquire(dir.path(), "backup", &platform).unwrap();
    let second = acquire(dir.path(), "backup", &platform);
    assert!(second.is_err());
}

#[test]
fn marker_naming_a_dead_pid_is_stale() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("backup.owner");
    std::fs::write(&marker, "424242").unwrap();
    let platform = FakePlatform::new();
    assert!(is_stale(&marker, &platform));
}

#[test]
fn marker_naming_a_live_pid_is_not_stale() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("backup.owner");
    std::fs::write(&marker, "424242").unwrap();
    let platform = FakePlatform::new();
    platform.set_alive(424242, "checkpoint-agent");
    assert!(!is_stale(&marker, &platform));
}

#[test]
fn missing_marker_is_not_stale() {
    let dir = tempfile::tempdir().unwrap();
    let platform = FakePlatform::new();
    assert!(!is_stale(&dir.path().join("nope.owner"), &platform));
}
