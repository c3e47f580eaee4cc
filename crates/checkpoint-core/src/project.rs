// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The registered Project and its global defaults (spec.md §3).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Stable per-project identifier (slugified project name).
    pub struct ProjectId("prj-");
}

/// Symlink handling policy for the file phase (spec.md §4.5 step 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymlinkPolicy {
    Follow,
    Preserve,
    Skip,
}

impl Default for SymlinkPolicy {
    fn default() -> Self {
        SymlinkPolicy::Preserve
    }
}

/// Tagged watcher backend variant, chosen once at watcher start and exposed
/// read-only for logs and `status` (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatcherBackendKind {
    NativeKqueueStyle,
    NativeInotifyStyle,
    Polling,
}

impl std::fmt::Display for WatcherBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WatcherBackendKind::NativeKqueueStyle => "native-kqueue-style",
            WatcherBackendKind::NativeInotifyStyle => "native-inotify-style",
            WatcherBackendKind::Polling => "polling",
        })
    }
}

/// Process-wide values that fill unset per-project fields at config-load
/// time. Precedence (highest first): environment overrides, per-project
/// config, global config, these built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalDefaults {
    pub debounce_seconds: u64,
    pub session_idle_threshold_secs: u64,
    pub backup_interval_secs: u64,
    pub poll_interval_secs: u64,
    pub compression_level: u32,
    pub disk_warn_pct: u8,
    pub disk_block_pct: u8,
    pub retention_keep_minimum: u32,
    pub symlink_policy: SymlinkPolicy,
    pub auto_start_local_db: bool,
    pub stop_db_after_backup: bool,
    pub backup_remote_databases: bool,
    pub backup_docker_databases: bool,
    pub auto_start_docker: bool,
    pub db_connect_timeout_secs: u64,
    pub drive_verification_enabled: bool,
}

impl Default for GlobalDefaults {
    fn default() -> Self {
        Self {
            debounce_seconds: 60,
            session_idle_threshold_secs: 600,
            backup_interval_secs: 3600,
            poll_interval_secs: 30,
            compression_level: 6,
            disk_warn_pct: 80,
            disk_block_pct: 90,
            retention_keep_minimum: 3,
            symlink_policy: SymlinkPolicy::Preserve,
            auto_start_local_db: true,
            stop_db_after_backup: true,
            backup_remote_databases: false,
            backup_docker_databases: true,
            auto_start_docker: true,
            db_connect_timeout_secs: 120,
            drive_verification_enabled: false,
        }
    }
}

impl GlobalDefaults {
    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce_seconds)
    }

    pub fn session_idle_threshold(&self) -> Duration {
        Duration::from_secs(self.session_idle_threshold_secs)
    }

    pub fn backup_interval(&self) -> Duration {
        Duration::from_secs(self.backup_interval_secs)
    }
}

/// An identified workspace on disk, created at registration and mutated
/// only by config edits (spec.md §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub root: PathBuf,
    pub backup_dir: PathBuf,
    pub cloud_dir: Option<PathBuf>,
    pub remote_uri: Option<String>,
    pub drive_marker: Option<PathBuf>,
    pub encryption_key_file: Option<PathBuf>,
    #[serde(default)]
    pub enable_env_capture: bool,
    #[serde(default)]
    pub enable_ide_capture: bool,
    #[serde(default)]
    pub enable_notes_capture: bool,
    #[serde(default)]
    pub enable_ai_artifact_capture: bool,
    #[serde(default)]
    pub enable_db_backup: bool,
    #[serde(default)]
    pub overrides: GlobalDefaults,
}

impl Project {
    /// Slugify a human project name into a stable identifier suffix.
    ///
    /// Lowercases, replaces runs of non-alphanumerics with `-`, and trims
    /// leading/trailing separators. Used at registration time only; the
    /// `ProjectId` itself is a random nanoid, not derived from this.
    pub fn slugify(name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        let mut last_was_sep = false;
        for ch in name.chars() {
            if ch.is_ascii_alphanumeric() {
                out.push(ch.to_ascii_lowercase());
                last_was_sep = false;
            } else if !last_was_sep && !out.is_empty() {
                out.push('-');
                last_was_sep = true;
            }
        }
        while out.ends_with('-') {
            out.pop();
        }
        out
    }

    pub fn state_dir(&self, state_root: &std::path::Path) -> PathBuf {
        state_root.join("projects").join(self.id.as_str())
    }
}
