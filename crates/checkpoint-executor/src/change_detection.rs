// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change detection (spec.md §4.5 step 4): prefer the project's VCS when
//! present, otherwise enumerate with the standard exclude set. Either way,
//! the decision is "did anything in the candidate set change since
//! `last-backup-time`".

use std::path::{Path, PathBuf};

use checkpoint_watcher::ExclusionSet;
use tokio::process::Command;

use crate::error::ExecutorError;
use crate::subprocess::{run_with_timeout, GIT_STATUS_TIMEOUT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    Vcs,
    Walk,
}

#[derive(Debug, Clone)]
pub struct ChangeDetectionResult {
    pub changed: bool,
    pub candidate_files: Vec<PathBuf>,
    pub source: ChangeSource,
}

pub async fn detect(
    project_root: &Path,
    excludes: &ExclusionSet,
    last_backup_epoch_secs: u64,
) -> Result<ChangeDetectionResult, ExecutorError> {
    let (candidate_files, source) = if project_root.join(".git").exists() {
        (git_candidates(project_root, excludes).await?, ChangeSource::Vcs)
    } else {
        (walk_candidates(project_root, excludes)?, ChangeSource::Walk)
    };

    let changed = candidate_files.iter().any(|path| modified_after(path, last_backup_epoch_secs));

    Ok(ChangeDetectionResult { changed, candidate_files, source })
}

fn modified_after(path: &Path, last_backup_epoch_secs: u64) -> bool {
    std::fs::symlink_metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|modified| modified.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|since_epoch| since_epoch.as_secs() > last_backup_epoch_secs)
        .unwrap_or(false)
}

/// Tracked-and-modified plus untracked-not-ignored files, per `git status
/// --porcelain` (ignored files never appear in that output), filtered
/// through our own exclude set on top.
async fn git_candidates(
    project_root: &Path,
    excludes: &ExclusionSet,
) -> Result<Vec<PathBuf>, ExecutorError> {
    let mut cmd = Command::new("git");
    cmd.args(["-C", &project_root.display().to_string(), "status", "--porcelain", "--untracked-files=normal"]);
    let output = run_with_timeout(cmd, GIT_STATUS_TIMEOUT, "git status").await?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut files = Vec::new();
    for line in stdout.lines() {
        if line.len() < 4 {
            continue;
        }
        let rest = &line[3..];
        let rel = match rest.split_once(" -> ") {
            Some((_, new_path)) => new_path,
            None => rest,
        };
        let rel = rel.trim_matches('"');
        let full = project_root.join(rel);
        if !excludes.is_excluded(&full) {
            files.push(full);
        }
    }
    Ok(files)
}

fn walk_candidates(project_root: &Path, excludes: &ExclusionSet) -> Result<Vec<PathBuf>, ExecutorError> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(project_root)
        .into_iter()
        .filter_entry(|e| !excludes.is_excluded(e.path()))
    {
        let entry = entry.map_err(|e| ExecutorError::Io(e.into()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
#[path = "change_detection_tests.rs"]
mod tests;
