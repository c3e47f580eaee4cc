// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requests the CLI sends to a running `checkpoint-watch` process over the
//! status socket (spec.md §6, the `status` and `watch status` commands).

use checkpoint_core::ProjectId;
use serde::{Deserialize, Serialize};

/// A request sent from `checkpoint` (the CLI) to a live `checkpoint-watch`
/// process. The watcher is the only long-running process with in-memory
/// state (current backend, pending debounce queue) that a PID file or state
/// file on disk cannot reflect; everything else in spec.md's status
/// dashboard is read directly from state files by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Query {
    /// Liveness probe, answered with [`crate::Response::Pong`].
    Ping,

    /// Ask for the watcher's current in-memory status for one project.
    WatcherStatus { project_id: ProjectId },

    /// Ask the watcher to re-read its exclusion rules and debounce config
    /// from disk without restarting the process.
    Reload { project_id: ProjectId },
}
