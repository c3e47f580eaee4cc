// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint status` specs.

use crate::prelude::TestEnv;

#[test]
fn a_project_with_nothing_running_is_reported_healthy() {
    let env = TestEnv::new();
    let output = env.checkpoint().args(["status"]).output().expect("run checkpoint status");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&env.project.name), "stdout was: {stdout}");
    assert!(stdout.contains("ok"), "stdout was: {stdout}");
}

#[test]
fn verbose_text_includes_the_project_id() {
    let env = TestEnv::new();
    let output = env.checkpoint().args(["status", "--verbose"]).output().expect("run checkpoint status --verbose");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&env.project.id.to_string()), "stdout was: {stdout}");
}

#[test]
fn json_output_lists_one_entry_per_registered_project() {
    let env = TestEnv::new();
    let output =
        env.checkpoint().args(["--format", "json", "status"]).output().expect("run checkpoint status");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let entries = value.as_array().expect("array of project statuses");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["project_id"], env.project.id.to_string());
    assert_eq!(entries[0]["healthy"], true);
}
