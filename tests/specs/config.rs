// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint config {get,set,validate,migrate}` specs.

use crate::prelude::TestEnv;

#[test]
fn get_unset_key_reports_unset() {
    let env = TestEnv::new();
    let output =
        env.checkpoint().args(["config", "get", "--key", "compression_level"]).output().expect("config get");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(unset)"), "stdout was: {stdout}");
}

#[test]
fn get_unknown_key_exits_with_config_error() {
    let env = TestEnv::new();
    let output = env.checkpoint().args(["config", "get", "--key", "not_a_real_key"]).output().expect("config get");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn set_then_get_round_trips() {
    let env = TestEnv::new();
    let set_output = env
        .checkpoint()
        .args(["config", "set", "--key", "compression_level", "--value", "9"])
        .output()
        .expect("config set");
    assert!(set_output.status.success());

    let get_output =
        env.checkpoint().args(["config", "get", "--key", "compression_level"]).output().expect("config get");
    assert!(get_output.status.success());
    let stdout = String::from_utf8_lossy(&get_output.stdout);
    assert!(stdout.trim() == "9", "stdout was: {stdout}");
}

#[test]
fn set_unknown_key_exits_with_config_error() {
    let env = TestEnv::new();
    let output = env
        .checkpoint()
        .args(["config", "set", "--key", "not_a_real_key", "--value", "x"])
        .output()
        .expect("config set");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn validate_accepts_an_empty_config_file() {
    let env = TestEnv::new();
    let output = env.checkpoint().args(["config", "validate"]).output().expect("config validate");
    assert!(output.status.success());
}

#[test]
fn migrate_rewrites_config_in_canonical_yaml() {
    let env = TestEnv::new();
    env.checkpoint()
        .args(["config", "set", "--key", "debounce_seconds", "--value", "30"])
        .output()
        .expect("config set");

    let output = env.checkpoint().args(["config", "migrate"]).output().expect("config migrate");
    assert!(output.status.success());

    let config_path = env.state_dir.path().join("projects").join(env.project.id.as_str()).join("config.yaml");
    let contents = std::fs::read_to_string(&config_path).expect("read migrated config");
    assert!(contents.contains("debounce_seconds"), "config was: {contents}");
}
