// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn excludes() -> ExclusionSet {
    ExclusionSet::new(&[], None)
}

#[tokio::test]
async fn non_vcs_project_with_no_files_reports_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let result = detect(dir.path(), &excludes(), 0).await.unwrap();
    assert!(!result.changed);
    assert_eq!(result.source, ChangeSource::Walk);
}

#[tokio::test]
async fn non_vcs_project_with_a_file_reports_changed_on_first_backup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"hi").unwrap();
    let result = detect(dir.path(), &excludes(), 0).await.unwrap();
    assert!(result.changed);
    assert_eq!(result.candidate_files.len(), 1);
}

#[tokio::test]
async fn non_vcs_project_excludes_node_modules() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("node_modules")).unwrap();
    std::fs::write(dir.path().join("node_modules/dep.js"), b"x").unwrap();
    let result = detect(dir.path(), &excludes(), 0).await.unwrap();
    assert!(!result.changed);
    assert!(result.candidate_files.is_empty());
}

#[tokio::test]
async fn future_last_backup_time_reports_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"hi").unwrap();
    let far_future = u64::MAX;
    let result = detect(dir.path(), &excludes(), far_future).await.unwrap();
    assert!(!result.changed);
}
