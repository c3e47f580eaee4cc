// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::Config;
use serial_test::serial;

#[test]
fn defaults_match_schema() {
    let config = Config::defaults();
    assert_eq!(config.get_duration("debounce_seconds").unwrap().as_secs(), 60);
    assert_eq!(config.get_int("disk_warn_pct"), Some(80));
    assert_eq!(config.get_bool("auto_start_local_db"), Some(true));
}

#[test]
fn merge_overlay_wins() {
    let base = Config::defaults();
    let mut overlay = Config::new();
    overlay.set("debounce_seconds", "120").unwrap();
    let merged = base.merged_with(&overlay);
    assert_eq!(merged.get_int("debounce_seconds"), Some(120));
    // Untouched keys still fall through to the base.
    assert_eq!(merged.get_int("disk_warn_pct"), Some(80));
}

#[test]
fn set_rejects_unknown_key() {
    let mut config = Config::new();
    assert!(config.set("not.a.key", "1").is_err());
}

#[test]
fn set_rejects_wrong_type() {
    let mut config = Config::new();
    assert!(config.set("disk_warn_pct", "not-a-number").is_err());
}

#[test]
fn load_flat_strips_comments_and_quotes() {
    let text = "DEBOUNCE_SECONDS=\"90\" # inline comment\nsymlink_policy=skip\n";
    let config = Config::load_flat_str(text);
    assert_eq!(config.get_raw("DEBOUNCE_SECONDS"), Some("90"));
    assert_eq!(config.get_raw("symlink_policy"), Some("skip"));
}

#[test]
fn load_yaml_flattens_nested_keys() {
    let text = "retention:\n  keep_minimum: 5\n  databases:\n    never_delete: true\n";
    let config = Config::load_yaml_str(text).unwrap();
    assert_eq!(config.get_int("retention.keep_minimum"), Some(5));
    assert_eq!(config.get_bool("retention.databases.never_delete"), Some(true));
}

#[test]
fn load_str_detects_yaml_vs_flat() {
    assert_eq!(
        Config::load_str("retention:\n  keep_minimum: 5\n").unwrap().get_int("retention.keep_minimum"),
        Some(5)
    );
    assert_eq!(Config::load_str("retention.keep_minimum=5\n").unwrap().get_int("retention.keep_minimum"), Some(5));
}

#[test]
#[serial]
fn env_override_takes_precedence() {
    std::env::set_var("CHECKPOINT_DEBOUNCE_SECONDS", "15");
    let mut config = Config::defaults();
    config.apply_env_overrides();
    assert_eq!(config.get_int("debounce_seconds"), Some(15));
    std::env::remove_var("CHECKPOINT_DEBOUNCE_SECONDS");
}

#[test]
fn write_atomic_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoint.yaml");
    let mut config = Config::defaults();
    config.set("symlink_policy", "skip").unwrap();
    config.write_atomic(&path).unwrap();
    let loaded = Config::load_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded.get_string("symlink_policy"), Some("skip".to_string()));
}
