// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{lookup, SCHEMA};

#[test]
fn every_key_is_unique() {
    let mut seen = std::collections::HashSet::new();
    for entry in SCHEMA {
        assert!(seen.insert(entry.key), "duplicate schema key {}", entry.key);
    }
}

#[test]
fn lookup_finds_known_key() {
    let entry = lookup("debounce_seconds").unwrap();
    assert_eq!(entry.default, "60");
}

#[test]
fn lookup_returns_none_for_unknown_key() {
    assert!(lookup("not.a.real.key").is_none());
}
