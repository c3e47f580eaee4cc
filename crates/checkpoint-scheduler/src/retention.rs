// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The retention engine (spec.md §4.7): per-bucket time/count/size rules
//! that combine by union-of-deletions, clamped by an inviolable floor.
//! Runs against the backup directory layout directly rather than a
//! database, since backup artifacts are files and directories, not rows.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use checkpoint_state::Config;

use crate::error::SchedulerError;

/// Rules for one retention bucket (`databases` or `files`). A `0` in any
/// numeric field disables that rule, matching the schema's "0 disables"
/// convention (spec.md §4.2).
#[derive(Debug, Clone, Copy, Default)]
pub struct BucketPolicy {
    pub time_based_days: u32,
    pub count_based: u32,
    pub size_based_mb: u64,
    pub never_delete: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RetentionPolicy {
    pub databases: BucketPolicy,
    pub files: BucketPolicy,
    pub floor: usize,
}

impl RetentionPolicy {
    pub fn from_config(cfg: &Config) -> Self {
        let bucket = |prefix: &str| BucketPolicy {
            time_based_days: cfg.get_int(&format!("retention.{prefix}.time_based_days")).unwrap_or(0).max(0) as u32,
            count_based: cfg.get_int(&format!("retention.{prefix}.count_based")).unwrap_or(0).max(0) as u32,
            size_based_mb: cfg.get_int(&format!("retention.{prefix}.size_based_mb")).unwrap_or(0).max(0) as u64,
            never_delete: cfg.get_bool(&format!("retention.{prefix}.never_delete")).unwrap_or(false),
        };
        Self {
            databases: bucket("databases"),
            files: bucket("files"),
            floor: cfg.get_int("retention.keep_minimum").unwrap_or(3).max(0) as usize,
        }
    }
}

/// One candidate for deletion: either a flat dump file (`databases` bucket)
/// or an archived-snapshot directory (`files` bucket), each treated as an
/// atomic unit.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub created_epoch_secs: u64,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RetentionReport {
    pub databases_deleted: Vec<PathBuf>,
    pub files_deleted: Vec<PathBuf>,
}

fn epoch_secs(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

fn dir_size_bytes(path: &Path) -> u64 {
    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Lists immediate children of `dir` as artifacts. `as_directories` treats
/// each child directory as one artifact (`files` bucket's `archived/<stamp>/`
/// layout); otherwise each child file is one artifact (`databases` bucket's
/// flat dump files).
fn list_artifacts(dir: &Path, as_directories: bool) -> Vec<Artifact> {
    let Ok(entries) = std::fs::read_dir(dir) else { return Vec::new() };
    let mut artifacts = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let is_dir = path.is_dir();
        if is_dir != as_directories {
            continue;
        }
        let Ok(meta) = entry.metadata() else { continue };
        let created = meta.modified().map(epoch_secs).unwrap_or(0);
        let size = if is_dir { dir_size_bytes(&path) } else { meta.len() };
        artifacts.push(Artifact { path, created_epoch_secs: created, size_bytes: size });
    }
    artifacts
}

/// Computes the set of artifacts to delete for one bucket. `artifacts` need
/// not be pre-sorted.
pub fn plan_deletions(artifacts: &[Artifact], policy: &BucketPolicy, floor: usize, now: u64) -> Vec<PathBuf> {
    if policy.never_delete {
        return Vec::new();
    }

    let mut by_age = artifacts.to_vec();
    by_age.sort_by(|a, b| b.created_epoch_secs.cmp(&a.created_epoch_secs)); // newest first

    let mut marked: std::collections::HashSet<PathBuf> = std::collections::HashSet::new();

    if policy.time_based_days > 0 {
        let cutoff = now.saturating_sub(policy.time_based_days as u64 * 86_400);
        for a in &by_age {
            if a.created_epoch_secs < cutoff {
                marked.insert(a.path.clone());
            }
        }
    }

    if policy.count_based > 0 && by_age.len() > policy.count_based as usize {
        for a in &by_age[policy.count_based as usize..] {
            marked.insert(a.path.clone());
        }
    }

    if policy.size_based_mb > 0 {
        let cap_bytes = policy.size_based_mb * 1_024 * 1_024;
        let mut running_total: u64 = by_age.iter().map(|a| a.size_bytes).sum();
        for a in by_age.iter().rev() {
            if running_total <= cap_bytes {
                break;
            }
            marked.insert(a.path.clone());
            running_total = running_total.saturating_sub(a.size_bytes);
        }
    }

    // Clamp by floor: never let the union of deletions drop the bucket
    // below `floor` remaining artifacts. Un-mark the newest marked entries
    // first, since those are the least-stale candidates.
    let remaining = artifacts.len().saturating_sub(marked.len());
    if remaining < floor {
        let mut deficit = floor - remaining;
        for a in &by_age {
            if deficit == 0 {
                break;
            }
            if marked.remove(&a.path) {
                deficit -= 1;
            }
        }
    }

    by_age.into_iter().map(|a| a.path).filter(|p| marked.contains(p)).collect()
}

fn remove_artifact(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Sweeps `backup_dir`'s `databases/` and `archived/` buckets against
/// `policy`, deleting what's planned and returning a report of what went.
pub fn sweep_backup_dir(backup_dir: &Path, policy: &RetentionPolicy, now: u64) -> Result<RetentionReport, SchedulerError> {
    let mut report = RetentionReport::default();

    let databases = list_artifacts(&backup_dir.join("databases"), false);
    for path in plan_deletions(&databases, &policy.databases, policy.floor, now) {
        remove_artifact(&path)?;
        report.databases_deleted.push(path);
    }

    let files = list_artifacts(&backup_dir.join("archived"), true);
    for path in plan_deletions(&files, &policy.files, policy.floor, now) {
        remove_artifact(&path)?;
        report.files_deleted.push(path);
    }

    Ok(report)
}

/// Same planning pass as [`sweep_backup_dir`] without deleting anything —
/// for `cleanup --preview` (spec.md §6).
pub fn preview_backup_dir(backup_dir: &Path, policy: &RetentionPolicy, now: u64) -> RetentionReport {
    let mut report = RetentionReport::default();

    let databases = list_artifacts(&backup_dir.join("databases"), false);
    report.databases_deleted = plan_deletions(&databases, &policy.databases, policy.floor, now);

    let files = list_artifacts(&backup_dir.join("archived"), true);
    report.files_deleted = plan_deletions(&files, &policy.files, policy.floor, now);

    report
}

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;
