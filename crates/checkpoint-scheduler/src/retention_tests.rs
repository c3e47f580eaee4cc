// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn artifact(path: &str, age_secs_ago: u64, size_bytes: u64, now: u64) -> Artifact {
    Artifact { path: PathBuf::from(path), created_epoch_secs: now.saturating_sub(age_secs_ago), size_bytes }
}

#[test]
fn never_delete_keeps_everything() {
    let now = 1_000_000;
    let artifacts = vec![artifact("a", 1000, 1, now), artifact("b", 2000, 1, now)];
    let policy = BucketPolicy { time_based_days: 1, never_delete: true, ..Default::default() };
    assert!(plan_deletions(&artifacts, &policy, 0, now).is_empty());
}

#[test]
fn time_based_deletes_only_stale_entries() {
    let now = 10 * 86_400;
    let artifacts = vec![
        artifact("fresh", 1 * 86_400, 1, now),
        artifact("stale", 8 * 86_400, 1, now),
    ];
    let policy = BucketPolicy { time_based_days: 5, ..Default::default() };
    let deleted = plan_deletions(&artifacts, &policy, 0, now);
    assert_eq!(deleted, vec![PathBuf::from("stale")]);
}

#[test]
fn count_based_keeps_only_the_newest_k() {
    let now = 1_000_000;
    let artifacts = vec![
        artifact("newest", 10, 1, now),
        artifact("middle", 20, 1, now),
        artifact("oldest", 30, 1, now),
    ];
    let policy = BucketPolicy { count_based: 2, ..Default::default() };
    let deleted = plan_deletions(&artifacts, &policy, 0, now);
    assert_eq!(deleted, vec![PathBuf::from("oldest")]);
}

#[test]
fn size_based_prunes_oldest_until_under_cap() {
    let now = 1_000_000;
    let mb = 1_024 * 1_024;
    let artifacts = vec![
        artifact("newest", 10, 2 * mb, now),
        artifact("middle", 20, 2 * mb, now),
        artifact("oldest", 30, 2 * mb, now),
    ];
    let policy = BucketPolicy { size_based_mb: 3, ..Default::default() };
    let deleted = plan_deletions(&artifacts, &policy, 0, now);
    assert_eq!(deleted, vec![PathBuf::from("oldest")]);
}

#[test]
fn floor_protects_minimum_artifacts_even_against_aggressive_rules() {
    let now = 1_000_000;
    let artifacts =
        vec![artifact("a", 100, 1, now), artifact("b", 200, 1, now), artifact("c", 300, 1, now)];
    let policy = BucketPolicy { time_based_days: 0, count_based: 1, ..Default::default() };
    let deleted = plan_deletions(&artifacts, &policy, 2, now);
    // count_based=1 would mark b and c, but floor=2 keeps one of them.
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0], PathBuf::from("c"));
}

#[test]
fn sweep_deletes_from_disk_and_reports_what_went() {
    let dir = tempfile::tempdir().unwrap();
    let backup_dir = dir.path();
    let databases_dir = backup_dir.join("databases");
    std::fs::create_dir_all(&databases_dir).unwrap();
    for name in ["old.sql.gz", "new.sql.gz"] {
        std::fs::write(databases_dir.join(name), b"dump").unwrap();
    }

    let archived_dir = backup_dir.join("archived");
    std::fs::create_dir_all(archived_dir.join("20200101_000000")).unwrap();
    std::fs::write(archived_dir.join("20200101_000000").join("a.txt"), b"old").unwrap();

    let policy = RetentionPolicy {
        databases: BucketPolicy { count_based: 1, ..Default::default() },
        files: BucketPolicy::default(),
        floor: 0,
    };

    let now = epoch_secs(std::time::SystemTime::now());
    let report = sweep_backup_dir(backup_dir, &policy, now).unwrap();
    assert_eq!(report.databases_deleted.len(), 1);
    assert_eq!(std::fs::read_dir(&databases_dir).unwrap().count(), 1);
}

#[test]
fn preview_reports_planned_deletions_without_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let backup_dir = dir.path();
    let databases_dir = backup_dir.join("databases");
    std::fs::create_dir_all(&databases_dir).unwrap();
    for name in ["old.sql.gz", "new.sql.gz"] {
        std::fs::write(databases_dir.join(name), b"dump").unwrap();
    }

    let policy = RetentionPolicy {
        databases: BucketPolicy { count_based: 1, ..Default::default() },
        files: BucketPolicy::default(),
        floor: 0,
    };

    let now = epoch_secs(std::time::SystemTime::now());
    let report = preview_backup_dir(backup_dir, &policy, now);
    assert_eq!(report.databases_deleted.len(), 1);
    assert_eq!(std::fs::read_dir(&databases_dir).unwrap().count(), 2);
}
