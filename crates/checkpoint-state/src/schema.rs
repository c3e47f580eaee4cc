// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Every recognized config key, its type, default, and description
//! (spec.md §4.2, "Owns a schema enumerating every recognized key").

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Int,
    Bool,
    Duration,
    Path,
    Enum,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::String => "string",
            ValueKind::Int => "int",
            ValueKind::Bool => "bool",
            ValueKind::Duration => "duration",
            ValueKind::Path => "path",
            ValueKind::Enum => "enum",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KeySchema {
    pub key: &'static str,
    pub kind: ValueKind,
    pub default: &'static str,
    pub description: &'static str,
}

/// Every dotted key Checkpoint recognizes. Unknown keys on load produce a
/// warning, never a hard failure (spec.md §4.2).
pub const SCHEMA: &[KeySchema] = &[
    KeySchema {
        key: "debounce_seconds",
        kind: ValueKind::Duration,
        default: "60",
        description: "trailing-edge quiet period before a watcher-triggered backup",
    },
    KeySchema {
        key: "session_idle_threshold_secs",
        kind: ValueKind::Duration,
        default: "600",
        description: "gap after which the next event starts a new session",
    },
    KeySchema {
        key: "backup_interval_secs",
        kind: ValueKind::Duration,
        default: "3600",
        description: "minimum time between interval-triggered backups",
    },
    KeySchema {
        key: "poll_interval_secs",
        kind: ValueKind::Duration,
        default: "30",
        description: "polling-backend scan interval",
    },
    KeySchema {
        key: "compression_level",
        kind: ValueKind::Int,
        default: "6",
        description: "gzip compression level for archived snapshots",
    },
    KeySchema {
        key: "disk_warn_pct",
        kind: ValueKind::Int,
        default: "80",
        description: "disk usage percentage that triggers a warning",
    },
    KeySchema {
        key: "disk_block_pct",
        kind: ValueKind::Int,
        default: "90",
        description: "disk usage percentage that blocks a backup",
    },
    KeySchema {
        key: "retention.keep_minimum",
        kind: ValueKind::Int,
        default: "3",
        description: "inviolable floor for any retention bucket",
    },
    KeySchema {
        key: "retention.databases.time_based_days",
        kind: ValueKind::Int,
        default: "0",
        description: "delete database artifacts older than N days (0 disables)",
    },
    KeySchema {
        key: "retention.databases.count_based",
        kind: ValueKind::Int,
        default: "0",
        description: "keep only the newest K database artifacts (0 disables)",
    },
    KeySchema {
        key: "retention.databases.size_based_mb",
        kind: ValueKind::Int,
        default: "0",
        description: "prune oldest database artifacts once bucket exceeds S MB (0 disables)",
    },
    KeySchema {
        key: "retention.databases.never_delete",
        kind: ValueKind::Bool,
        default: "false",
        description: "disable all pruning for the databases bucket",
    },
    KeySchema {
        key: "retention.files.time_based_days",
        kind: ValueKind::Int,
        default: "0",
        description: "delete file artifacts older than N days (0 disables)",
    },
    KeySchema {
        key: "retention.files.count_based",
        kind: ValueKind::Int,
        default: "0",
        description: "keep only the newest K file artifacts (0 disables)",
    },
    KeySchema {
        key: "retention.files.size_based_mb",
        kind: ValueKind::Int,
        default: "0",
        description: "prune oldest file artifacts once bucket exceeds S MB (0 disables)",
    },
    KeySchema {
        key: "retention.files.never_delete",
        kind: ValueKind::Bool,
        default: "false",
        description: "disable all pruning for the files bucket",
    },
    KeySchema {
        key: "symlink_policy",
        kind: ValueKind::Enum,
        default: "preserve",
        description: "follow | preserve | skip",
    },
    KeySchema {
        key: "auto_start_local_db",
        kind: ValueKind::Bool,
        default: "true",
        description: "transiently start a local DB engine if not running before dumping it",
    },
    KeySchema {
        key: "stop_db_after_backup",
        kind: ValueKind::Bool,
        default: "true",
        description: "stop a DB engine we transiently started once the dump completes",
    },
    KeySchema {
        key: "backup_remote_databases",
        kind: ValueKind::Bool,
        default: "false",
        description: "dump network databases not resolved to localhost",
    },
    KeySchema {
        key: "backup_docker_databases",
        kind: ValueKind::Bool,
        default: "true",
        description: "dump databases discovered inside docker-compose services",
    },
    KeySchema {
        key: "auto_start_docker",
        kind: ValueKind::Bool,
        default: "true",
        description: "start Docker if not running before dumping a docker-db",
    },
    KeySchema {
        key: "db_connect_timeout_secs",
        kind: ValueKind::Duration,
        default: "120",
        description: "connection timeout bound for remote database dumps",
    },
    KeySchema {
        key: "drive_verification_enabled",
        kind: ValueKind::Bool,
        default: "false",
        description: "require a drive-marker file to exist before any backup starts",
    },
    KeySchema {
        key: "drive_marker",
        kind: ValueKind::Path,
        default: "",
        description: "path whose presence gates backups when drive verification is enabled",
    },
    KeySchema {
        key: "encryption_key_file",
        kind: ValueKind::Path,
        default: "",
        description: "age recipient key file; empty disables encryption",
    },
    KeySchema {
        key: "cloud_dir",
        kind: ValueKind::Path,
        default: "",
        description: "local cloud-folder mirror destination; empty disables it",
    },
    KeySchema {
        key: "remote_uri",
        kind: ValueKind::String,
        default: "",
        description: "opaque remote mirror destination URI; empty disables it",
    },
    KeySchema {
        key: "enable_env_capture",
        kind: ValueKind::Bool,
        default: "true",
        description: "capture .env* files during critical-file capture",
    },
    KeySchema {
        key: "enable_ide_capture",
        kind: ValueKind::Bool,
        default: "false",
        description: "capture IDE/editor settings during critical-file capture",
    },
    KeySchema {
        key: "enable_notes_capture",
        kind: ValueKind::Bool,
        default: "false",
        description: "capture local notes during critical-file capture",
    },
    KeySchema {
        key: "enable_ai_artifact_capture",
        kind: ValueKind::Bool,
        default: "false",
        description: "capture AI-assistant artifact directories during critical-file capture",
    },
    KeySchema {
        key: "enable_db_backup",
        kind: ValueKind::Bool,
        default: "true",
        description: "run the database phase for this project",
    },
    KeySchema {
        key: "quiet_hours",
        kind: ValueKind::String,
        default: "",
        description: "HH-HH window during which non-critical notifications are suppressed",
    },
    KeySchema {
        key: "watchdog_missed_heartbeats",
        kind: ValueKind::Int,
        default: "3",
        description: "consecutive missed heartbeats before the watchdog restarts a periodic agent",
    },
    KeySchema {
        key: "notify_repeat_after_hours",
        kind: ValueKind::Int,
        default: "4",
        description: "hours a fault must persist before re-sending a suppressed notification",
    },
];

pub fn lookup(key: &str) -> Option<&'static KeySchema> {
    SCHEMA.iter().find(|s| s.key == key)
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
