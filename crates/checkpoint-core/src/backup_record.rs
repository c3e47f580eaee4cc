// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Backup Record (spec.md §3) — one attempted backup.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::project::ProjectId;

/// What caused this backup attempt (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCause {
    Session,
    Interval,
    Watcher,
    Manual,
}

impl std::fmt::Display for TriggerCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TriggerCause::Session => "session",
            TriggerCause::Interval => "interval",
            TriggerCause::Watcher => "watcher",
            TriggerCause::Manual => "manual",
        })
    }
}

/// The outcome of one attempted backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupOutcome {
    Success,
    Partial,
    Failed,
    Skipped,
}

impl std::fmt::Display for BackupOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BackupOutcome::Success => "success",
            BackupOutcome::Partial => "partial",
            BackupOutcome::Failed => "failed",
            BackupOutcome::Skipped => "skipped",
        })
    }
}

/// Per-database sub-outcome recorded inside a [`BackupRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbSubOutcome {
    pub descriptor_key: String,
    pub outcome: BackupOutcome,
    pub bytes_written: u64,
    pub detail: Option<String>,
}

/// One attempted backup, persisted as a log line and reflected in the
/// `last-backup-time` state file on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub project_id: ProjectId,
    pub start_epoch_secs: u64,
    pub end_epoch_secs: u64,
    pub outcome: BackupOutcome,
    pub db_outcomes: Vec<DbSubOutcome>,
    pub bytes_written: u64,
    pub cause: TriggerCause,
    pub backup_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl BackupRecord {
    pub fn duration_secs(&self) -> u64 {
        self.end_epoch_secs.saturating_sub(self.start_epoch_secs)
    }

    /// Downgrade `Success` to `Partial` — used when a mirror or per-artifact
    /// step fails non-fatally (spec.md §4.5 step 11).
    pub fn downgrade_to_partial(&mut self) {
        if self.outcome == BackupOutcome::Success {
            self.outcome = BackupOutcome::Partial;
        }
    }
}
