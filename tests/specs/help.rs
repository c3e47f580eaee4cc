// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help and version output.

use crate::prelude::TestEnv;

#[test]
fn no_args_shows_usage_and_exits_nonzero() {
    let env = TestEnv::new();
    let output = env.checkpoint().output().expect("run checkpoint");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage:"), "stderr was: {stderr}");
}

#[test]
fn help_shows_usage() {
    let env = TestEnv::new();
    let output = env.checkpoint().arg("--help").output().expect("run checkpoint --help");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "stdout was: {stdout}");
}

#[test]
fn version_shows_name() {
    let env = TestEnv::new();
    let output = env.checkpoint().arg("--version").output().expect("run checkpoint --version");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("checkpoint"), "stdout was: {stdout}");
}

#[test]
fn watch_help_shows_subcommands() {
    let env = TestEnv::new();
    let output = env.checkpoint().args(["watch", "--help"]).output().expect("run checkpoint watch --help");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for word in ["start", "stop", "status"] {
        assert!(stdout.contains(word), "expected '{word}' in: {stdout}");
    }
}

#[test]
fn config_help_shows_subcommands() {
    let env = TestEnv::new();
    let output = env.checkpoint().args(["config", "--help"]).output().expect("run checkpoint config --help");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for word in ["get", "set", "validate", "migrate"] {
        assert!(stdout.contains(word), "expected '{word}' in: {stdout}");
    }
}
