// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint now` specs.

use crate::prelude::TestEnv;

#[test]
fn dry_run_reports_without_touching_disk() {
    let env = TestEnv::new();
    let output = env.checkpoint().args(["now", "--dry-run"]).output().expect("run checkpoint now --dry-run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("would back up"), "stdout was: {stdout}");
    assert!(!env.project.backup_dir.exists());
}

#[test]
fn outside_a_registered_project_exits_with_config_error() {
    let env = TestEnv::new();
    let elsewhere = tempfile::tempdir().expect("elsewhere tempdir");
    let mut cmd = env.checkpoint();
    cmd.current_dir(elsewhere.path());
    let output = cmd.arg("now").output().expect("run checkpoint now");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn dry_run_json_emits_project_id() {
    let env = TestEnv::new();
    let output =
        env.checkpoint().args(["--format", "json", "now", "--dry-run"]).output().expect("run checkpoint now --dry-run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["dry_run"], true);
    assert_eq!(value["project_id"], env.project.id.to_string());
}
