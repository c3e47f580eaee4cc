// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Backup Executor (spec.md §4.5): invoked with `(project, cause)`,
//! produces a Backup Record. Every step after lock acquisition is
//! best-effort — a failing step downgrades the outcome rather than aborting
//! the run, except for the handful of conditions (lock contention, pause,
//! missing drive, critical disk usage) that abort before any artifact is
//! touched.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use checkpoint_core::error::Categorized;
use checkpoint_core::{BackupOutcome, BackupRecord, Project, TriggerCause};
use checkpoint_db::DumpPolicy;
use checkpoint_platform::PlatformFacade;
use checkpoint_state::{ProjectState, StateRoot};
use checkpoint_watcher::ExclusionSet;

use crate::change_detection;
use crate::compression;
use crate::critical_files::{self, CriticalFileFlags};
use crate::db_phase;
use crate::encryption;
use crate::error::ExecutorError;
use crate::file_phase;
use crate::mirror;
use crate::preflight::{self, PreflightThresholds};
use crate::retention_hook::RetentionHook;
use crate::verify;

fn now_epoch_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

fn timestamp_now() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Runs one full backup attempt for `project`, returning a [`BackupRecord`]
/// unconditionally — failures are reflected in the record's outcome rather
/// than propagated, matching the Debouncer's `ExecutorDispatch` contract.
/// `force` implements `--force` (spec.md §4.5 "Force semantics"): it
/// bypasses the change-detection skip, never the lock, drive check, or
/// disk-critical block.
pub async fn run(
    state_root: &StateRoot,
    platform: &dyn PlatformFacade,
    retention_hook: &dyn RetentionHook,
    project: &Project,
    cause: TriggerCause,
    force: bool,
) -> BackupRecord {
    let start = now_epoch_secs();
    let lock_dir = state_root.path().join("locks");

    let guard = match checkpoint_platform::acquire_lock(&lock_dir, "backup", platform) {
        Ok(guard) => guard,
        Err(_) => return failed_record(project, cause, start, now_epoch_secs(), "backup lock contended"),
    };

    let record = run_locked(state_root, platform, retention_hook, project, cause, force, start).await;
    drop(guard);
    record
}

async fn run_locked(
    state_root: &StateRoot,
    platform: &dyn PlatformFacade,
    retention_hook: &dyn RetentionHook,
    project: &Project,
    cause: TriggerCause,
    force: bool,
    start: u64,
) -> BackupRecord {
    match run_inner(state_root, platform, project, cause, force, start).await {
        Ok(mut record) => {
            if record.outcome == BackupOutcome::Success || record.outcome == BackupOutcome::Partial {
                if let Err(err) = retention_hook.run_retention(&project.id).await {
                    tracing::warn!(project_id = %project.id, error = %err, "retention hook failed");
                }
            }
            record.end_epoch_secs = now_epoch_secs();
            record
        }
        Err(err) => {
            tracing::error!(project_id = %project.id, error = %err, category = ?err.category(), "backup aborted");
            failed_record(project, cause, start, now_epoch_secs(), &err.to_string())
        }
    }
}

async fn run_inner(
    state_root: &StateRoot,
    platform: &dyn PlatformFacade,
    project: &Project,
    cause: TriggerCause,
    force: bool,
    start: u64,
) -> Result<BackupRecord, ExecutorError> {
    let overrides = &project.overrides;
    let project_state = ProjectState::new(state_root, &project.id);

    preflight::run(
        state_root,
        overrides.drive_verification_enabled,
        project.drive_marker.as_deref(),
        &project.backup_dir,
        PreflightThresholds { warn_pct: overrides.disk_warn_pct, block_pct: overrides.disk_block_pct },
        platform,
    )?;

    let backup_dir_name = project.backup_dir.file_name().and_then(|n| n.to_str()).map(str::to_string);
    let excludes = ExclusionSet::new(&[], backup_dir_name.as_deref());
    let last_backup = project_state.last_backup_time();
    let change = change_detection::detect(&project.root, &excludes, last_backup).await?;

    if !change.changed && !force {
        return Ok(BackupRecord {
            project_id: project.id.clone(),
            start_epoch_secs: start,
            end_epoch_secs: start,
            outcome: BackupOutcome::Skipped,
            db_outcomes: vec![],
            bytes_written: 0,
            cause,
            backup_dirs: vec![],
            extra: BTreeMap::new(),
        });
    }

    let critical = critical_files::collect(
        &project.root,
        CriticalFileFlags {
            env_capture: project.enable_env_capture,
            ide_capture: project.enable_ide_capture,
            notes_capture: project.enable_notes_capture,
            ai_artifact_capture: project.enable_ai_artifact_capture,
        },
    );

    let mut candidate_files = change.candidate_files.clone();
    candidate_files.extend(critical);
    candidate_files.sort();
    candidate_files.dedup();

    let mut outcome = BackupOutcome::Success;
    let mut bytes_written = 0u64;
    let mut backup_dirs = vec![project.backup_dir.clone()];

    let db_outcomes = if project.enable_db_backup {
        let policy = DumpPolicy {
            auto_start_local_db: overrides.auto_start_local_db,
            stop_db_after_backup: overrides.stop_db_after_backup,
            backup_remote_databases: overrides.backup_remote_databases,
            backup_docker_databases: overrides.backup_docker_databases,
            auto_start_docker: overrides.auto_start_docker,
        };
        let db_dest = project.backup_dir.join("db");
        let db_outcome = db_phase::run(
            &project.root,
            &db_dest,
            std::process::id(),
            policy,
            std::time::Duration::from_secs(overrides.db_connect_timeout_secs),
            &state_root.path().join("cache"),
        )
        .await;
        bytes_written += db_outcome.bytes_written;
        if db_outcome.sub_outcomes.iter().any(|o| o.outcome == BackupOutcome::Failed) {
            outcome = BackupOutcome::Partial;
        }
        db_outcome.sub_outcomes
    } else {
        vec![]
    };

    let stamp = timestamp_now();
    let file_outcome = file_phase::stage(
        &candidate_files,
        &project.root,
        &project.backup_dir,
        overrides.symlink_policy,
        &stamp,
    )?;
    if !file_outcome.skipped_symlinks.is_empty() {
        outcome = downgrade(outcome);
    }

    let compressed = compression::compress_all(&file_outcome.staged, overrides.compression_level)?;
    bytes_written += compressed.iter().map(|a| a.bytes_written).sum::<u64>();

    let verified = verify::verify_all(&compressed);
    if !verified.failed.is_empty() {
        outcome = downgrade(outcome);
    }

    let mut final_artifacts: Vec<PathBuf> = verified.verified;
    if let Some(key_file) = &project.encryption_key_file {
        let mut encrypted = Vec::with_capacity(final_artifacts.len());
        for path in final_artifacts {
            match encryption::encrypt_file(&path, key_file) {
                Ok(enc_path) => encrypted.push(enc_path),
                Err(err) => {
                    tracing::warn!(project_id = %project.id, error = %err, "artifact encryption failed");
                    outcome = downgrade(outcome);
                    encrypted.push(path);
                }
            }
        }
        final_artifacts = encrypted;
    }
    let artifact_count = final_artifacts.len();

    let mirror_outcome =
        mirror::mirror(&project.backup_dir, project.cloud_dir.as_deref(), project.remote_uri.as_deref()).await;
    if mirror_outcome.any_failed() {
        outcome = downgrade(outcome);
    }
    if let Some(cloud_dir) = &project.cloud_dir {
        backup_dirs.push(cloud_dir.clone());
    }

    let now = now_epoch_secs();
    if outcome != BackupOutcome::Failed {
        project_state.set_last_backup_time(now)?;
    }
    let entry = checkpoint_state::AuditEntry {
        epoch_secs: now,
        key: format!("backup.{}", project.id),
        old: None,
        new: outcome.to_string(),
    };
    let _ = checkpoint_state::audit::append(&state_root.audit_log_path(), &entry);

    let mut extra = BTreeMap::new();
    extra.insert("artifact_count".to_string(), artifact_count.to_string());
    extra.insert("change_source".to_string(), format!("{:?}", change.source));

    Ok(BackupRecord {
        project_id: project.id.clone(),
        start_epoch_secs: start,
        end_epoch_secs: now,
        outcome,
        db_outcomes,
        bytes_written,
        cause,
        backup_dirs,
        extra,
    })
}

fn downgrade(outcome: BackupOutcome) -> BackupOutcome {
    if outcome == BackupOutcome::Success {
        BackupOutcome::Partial
    } else {
        outcome
    }
}

fn failed_record(
    project: &Project,
    cause: TriggerCause,
    start: u64,
    end: u64,
    detail: &str,
) -> BackupRecord {
    let mut extra = BTreeMap::new();
    extra.insert("error".to_string(), detail.to_string());
    BackupRecord {
        project_id: project.id.clone(),
        start_epoch_secs: start,
        end_epoch_secs: end,
        outcome: BackupOutcome::Failed,
        db_outcomes: vec![],
        bytes_written: 0,
        cause,
        backup_dirs: vec![],
        extra,
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
