// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{append, read_all, AuditEntry};

#[test]
fn append_then_read_all_round_trips_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config-audit.log");
    let first = AuditEntry { epoch_secs: 1, key: "debounce_seconds".into(), old: None, new: "60".into() };
    let second = AuditEntry {
        epoch_secs: 2,
        key: "debounce_seconds".into(),
        old: Some("60".into()),
        new: "90".into(),
    };
    append(&path, &first).unwrap();
    append(&path, &second).unwrap();
    let entries = read_all(&path).unwrap();
    assert_eq!(entries, vec![first, second]);
}

#[test]
fn read_all_tolerates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.log");
    assert_eq!(read_all(&path).unwrap(), Vec::new());
}
