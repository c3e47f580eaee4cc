// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint verify` specs.

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::prelude::TestEnv;

fn write_valid_gz(path: &std::path::Path) {
    let file = std::fs::File::create(path).expect("create fixture file");
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(b"-- sql dump contents --").expect("write gz contents");
    encoder.finish().expect("finish gz stream");
}

fn write_corrupt_gz(path: &std::path::Path) {
    std::fs::write(path, b"not actually gzip data").expect("write corrupt fixture");
}

#[test]
fn no_artifacts_reports_nothing_to_verify() {
    let env = TestEnv::new();
    let output = env.checkpoint().args(["verify"]).output().expect("run checkpoint verify");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("no database artifacts to verify"), "stdout was: {stdout}");
}

#[test]
fn a_valid_dump_passes_verification() {
    let env = TestEnv::new();
    let databases_dir = env.backup_databases_dir();
    std::fs::create_dir_all(&databases_dir).expect("create databases dir");
    let dump = databases_dir.join("good.sql.gz");
    write_valid_gz(&dump);

    let output = env.checkpoint().args(["verify"]).output().expect("run checkpoint verify");
    assert!(output.status.success());
    assert!(dump.exists(), "a valid dump must survive verification");
}

#[test]
fn a_corrupt_dump_fails_verification_and_is_removed() {
    let env = TestEnv::new();
    let databases_dir = env.backup_databases_dir();
    std::fs::create_dir_all(&databases_dir).expect("create databases dir");
    let dump = databases_dir.join("bad.sql.gz");
    write_corrupt_gz(&dump);

    let output = env.checkpoint().args(["verify"]).output().expect("run checkpoint verify");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(7));
    assert!(!dump.exists(), "a corrupt dump should be cleaned up on failed verification");
}

#[test]
fn json_output_lists_each_outcome() {
    let env = TestEnv::new();
    let databases_dir = env.backup_databases_dir();
    std::fs::create_dir_all(&databases_dir).expect("create databases dir");
    write_valid_gz(&databases_dir.join("good.sql.gz"));

    let output =
        env.checkpoint().args(["--format", "json", "verify"]).output().expect("run checkpoint verify");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let outcomes = value.as_array().expect("array of outcomes");
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0]["ok"], true);
}
