// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint cleanup` specs.

use crate::prelude::TestEnv;

#[test]
fn preview_on_an_empty_backup_dir_reports_nothing() {
    let env = TestEnv::new();
    let output = env.checkpoint().args(["cleanup"]).output().expect("run checkpoint cleanup");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nothing to clean up"), "stdout was: {stdout}");
}

#[test]
fn preview_never_deletes_anything() {
    let env = TestEnv::new();
    let databases_dir = env.backup_databases_dir();
    std::fs::create_dir_all(&databases_dir).expect("create databases dir");
    for i in 0..6 {
        std::fs::write(databases_dir.join(format!("dump-{i}.sql.gz")), b"dump").expect("write fixture dump");
    }

    env.checkpoint()
        .args(["config", "set", "--key", "retention.databases.count_based", "--value", "2"])
        .output()
        .expect("config set");
    env.checkpoint()
        .args(["config", "set", "--key", "retention.keep_minimum", "--value", "1"])
        .output()
        .expect("config set");

    let output = env.checkpoint().args(["cleanup"]).output().expect("run checkpoint cleanup");
    assert!(output.status.success());
    let remaining = std::fs::read_dir(&databases_dir).expect("read databases dir").count();
    assert_eq!(remaining, 6, "a preview must never delete artifacts");
}

#[test]
fn execute_trims_artifacts_past_the_count_based_rule() {
    let env = TestEnv::new();
    let databases_dir = env.backup_databases_dir();
    std::fs::create_dir_all(&databases_dir).expect("create databases dir");
    for i in 0..6 {
        std::fs::write(databases_dir.join(format!("dump-{i}.sql.gz")), b"dump").expect("write fixture dump");
    }

    env.checkpoint()
        .args(["config", "set", "--key", "retention.databases.count_based", "--value", "2"])
        .output()
        .expect("config set");
    env.checkpoint()
        .args(["config", "set", "--key", "retention.keep_minimum", "--value", "1"])
        .output()
        .expect("config set");

    let output = env.checkpoint().args(["cleanup", "--execute"]).output().expect("run checkpoint cleanup --execute");
    assert!(output.status.success());
    let remaining = std::fs::read_dir(&databases_dir).expect("read databases dir").count();
    assert_eq!(remaining, 2, "count_based=2 should trim down to 2 artifacts");
}

#[test]
fn json_output_reports_deleted_paths() {
    let env = TestEnv::new();
    let databases_dir = env.backup_databases_dir();
    std::fs::create_dir_all(&databases_dir).expect("create databases dir");

    let output = env.checkpoint().args(["--format", "json", "cleanup"]).output().expect("run checkpoint cleanup");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert!(value["databases_deleted"].is_array());
    assert!(value["files_deleted"].is_array());
}

#[test]
fn outside_a_registered_project_fails() {
    let env = TestEnv::new();
    let elsewhere = tempfile::tempdir().expect("elsewhere tempdir");
    let mut cmd = env.checkpoint();
    cmd.current_dir(elsewhere.path());
    let output = cmd.arg("cleanup").output().expect("run checkpoint cleanup");
    assert!(!output.status.success());
}
