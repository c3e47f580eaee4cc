// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn lifetime_flag_starts_absent() {
    let dir = tempfile::tempdir().unwrap();
    let flag = LifetimeFlag::new(dir.path());
    assert!(!flag.exists());
}

#[test]
fn lifetime_flag_marks_and_clears() {
    let dir = tempfile::tempdir().unwrap();
    let flag = LifetimeFlag::new(dir.path());
    flag.mark_started().unwrap();
    assert!(flag.exists());
    flag.clear().unwrap();
    assert!(!flag.exists());
}

#[tokio::test]
async fn flag_without_running_docker_reports_false() {
    let dir = tempfile::tempdir().unwrap();
    let flag = LifetimeFlag::new(dir.path());
    flag.mark_started().unwrap();
    // Docker is not expected to be installed/running in the test
    // environment, so the liveness check downgrades the stale flag.
    let result = flag.we_started_and_still_running().await;
    assert!(!result || is_docker_running().await);
}
