// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_file_is_staged_with_no_archive() {
    let project = tempfile::tempdir().unwrap();
    let backup = tempfile::tempdir().unwrap();
    let source = project.path().join("a.txt");
    std::fs::write(&source, b"v1").unwrap();

    let outcome =
        stage(&[source], project.path(), backup.path(), SymlinkPolicy::Preserve, "20260727_120000").unwrap();

    assert_eq!(outcome.staged.len(), 1);
    assert!(outcome.archived.is_empty());
    assert_eq!(std::fs::read_to_string(&outcome.staged[0]).unwrap(), "v1");
}

#[test]
fn existing_mirrored_file_is_archived_before_overwrite() {
    let project = tempfile::tempdir().unwrap();
    let backup = tempfile::tempdir().unwrap();
    let source = project.path().join("a.txt");
    std::fs::write(&source, b"v1").unwrap();
    stage(&[source.clone()], project.path(), backup.path(), SymlinkPolicy::Preserve, "20260727_120000").unwrap();

    std::fs::write(&source, b"v2").unwrap();
    let outcome =
        stage(&[source], project.path(), backup.path(), SymlinkPolicy::Preserve, "20260727_130000").unwrap();

    assert_eq!(outcome.archived.len(), 1);
    assert_eq!(std::fs::read_to_string(&outcome.archived[0]).unwrap(), "v1");
    assert_eq!(std::fs::read_to_string(backup.path().join("files/a.txt")).unwrap(), "v2");
}

#[cfg(unix)]
#[test]
fn skip_policy_leaves_symlinks_untouched() {
    let project = tempfile::tempdir().unwrap();
    let backup = tempfile::tempdir().unwrap();
    let target = project.path().join("real.txt");
    std::fs::write(&target, b"x").unwrap();
    let link = project.path().join("link.txt");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let outcome = stage(&[link.clone()], project.path(), backup.path(), SymlinkPolicy::Skip, "stamp").unwrap();

    assert_eq!(outcome.skipped_symlinks, vec![link]);
    assert!(outcome.staged.is_empty());
}

#[cfg(unix)]
#[test]
fn preserve_policy_recreates_the_symlink() {
    let project = tempfile::tempdir().unwrap();
    let backup = tempfile::tempdir().unwrap();
    let target = project.path().join("real.txt");
    std::fs::write(&target, b"x").unwrap();
    let link = project.path().join("link.txt");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let outcome = stage(&[link], project.path(), backup.path(), SymlinkPolicy::Preserve, "stamp").unwrap();

    let staged = &outcome.staged[0];
    assert!(std::fs::symlink_metadata(staged).unwrap().file_type().is_symlink());
}
