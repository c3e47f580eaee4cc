// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Responses a `checkpoint-watch` process sends back over the status socket.

use checkpoint_core::{BackupRecord, ProjectId, WatcherBackendKind};
use serde::{Deserialize, Serialize};

/// In-memory watcher status, snapshotted at query time. Distinct from the
/// on-disk state files in that it reflects the debounce queue's current
/// depth and the backend actually selected at startup, neither of which is
/// durable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatcherStatusPayload {
    pub project_id: ProjectId,
    pub backend: WatcherBackendKind,
    pub paused: bool,
    pub pending_changes: usize,
    pub quiet_timer_armed: bool,
    pub last_backup: Option<BackupRecord>,
}

/// A response sent from `checkpoint-watch` back to the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Answers [`crate::Query::Ping`].
    Pong,

    /// Answers [`crate::Query::WatcherStatus`].
    WatcherStatus { status: WatcherStatusPayload },

    /// Answers [`crate::Query::Reload`] on success.
    Reloaded,

    /// Any query the watcher could not satisfy (unknown project, I/O
    /// failure reading its own state, etc).
    Error { message: String },
}
