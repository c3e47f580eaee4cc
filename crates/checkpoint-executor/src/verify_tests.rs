// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use super::*;

fn gzip_file(path: &std::path::Path, data: &[u8]) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap();
}

#[test]
fn valid_gzip_artifact_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.sql.gz");
    gzip_file(&path, b"dump contents");

    let outcome = verify_all(&[CompressedArtifact { path: path.clone(), bytes_written: 10, compressed: true }]);

    assert_eq!(outcome.verified, vec![path]);
    assert!(outcome.failed.is_empty());
}

#[test]
fn corrupt_gzip_artifact_is_deleted_and_marked_failed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.sql.gz");
    std::fs::write(&path, b"not actually gzip").unwrap();

    let outcome = verify_all(&[CompressedArtifact { path: path.clone(), bytes_written: 10, compressed: true }]);

    assert_eq!(outcome.failed, vec![path.clone()]);
    assert!(outcome.verified.is_empty());
    assert!(!path.exists());
}

#[test]
fn uncompressed_artifact_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.txt");
    std::fs::write(&path, b"hi").unwrap();

    let outcome = verify_all(&[CompressedArtifact { path: path.clone(), bytes_written: 2, compressed: false }]);

    assert_eq!(outcome.verified, vec![path]);
}
