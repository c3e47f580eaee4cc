// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State Files: `last-backup-time`, `current-session-time`,
//! `daemon.heartbeat`, `*.pid`, `.checkpoint-paused` (spec.md §3, §4.5's
//! "State directory layout"). All writes are atomic (temp-then-rename);
//! reads tolerate absence by returning typed zero values, per spec.md §4.2.

use std::path::{Path, PathBuf};

use checkpoint_core::ProjectId;

use crate::error::StateError;

/// The root of Checkpoint's own state tree, distinct from any project's
/// backup destination. Typically `~/.local/state/checkpoint` or similar,
/// resolved by the caller (the CLI / agent binaries) via `dirs`.
#[derive(Debug, Clone)]
pub struct StateRoot {
    root: PathBuf,
}

impl StateRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn pause_sentinel(&self) -> PathBuf {
        self.root.join(".checkpoint-paused")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn audit_log_path(&self) -> PathBuf {
        self.root.join("config-audit.log")
    }

    pub fn project_dir(&self, project: &ProjectId) -> PathBuf {
        self.root.join("projects").join(project.as_str())
    }

    pub fn is_paused(&self) -> bool {
        self.pause_sentinel().exists()
    }

    pub fn pause(&self) -> Result<(), StateError> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.pause_sentinel(), b"")?;
        Ok(())
    }

    pub fn resume(&self) -> Result<(), StateError> {
        let path = self.pause_sentinel();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Per-project state file handle bundling the individually named files
/// under `<state_root>/projects/<project-id>/`.
#[derive(Debug, Clone)]
pub struct ProjectState {
    dir: PathBuf,
}

impl ProjectState {
    pub fn new(state_root: &StateRoot, project: &ProjectId) -> Self {
        Self { dir: state_root.project_dir(project) }
    }

    fn ensure_dir(&self) -> Result<(), StateError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn last_backup_time_path(&self) -> PathBuf {
        self.dir.join("last-backup-time")
    }

    fn current_session_time_path(&self) -> PathBuf {
        self.dir.join("current-session-time")
    }

    fn heartbeat_path(&self) -> PathBuf {
        self.dir.join("daemon.heartbeat")
    }

    fn pid_path(&self, role: &str) -> PathBuf {
        self.dir.join(format!("{role}.pid"))
    }

    /// Returns `0` if the file is absent (spec.md §4.2's "typed zero value"
    /// contract), never an error.
    pub fn last_backup_time(&self) -> u64 {
        read_epoch_secs(&self.last_backup_time_path())
    }

    /// Monotonic: refuses to rewind time (spec.md §3 invariant). Callers
    /// that need to force a reset should remove the file directly.
    pub fn set_last_backup_time(&self, epoch_secs: u64) -> Result<(), StateError> {
        if epoch_secs < self.last_backup_time() {
            return Ok(());
        }
        self.ensure_dir()?;
        write_atomic_line(&self.last_backup_time_path(), epoch_secs)
    }

    pub fn current_session_time(&self) -> u64 {
        read_epoch_secs(&self.current_session_time_path())
    }

    pub fn set_current_session_time(&self, epoch_secs: u64) -> Result<(), StateError> {
        self.ensure_dir()?;
        write_atomic_line(&self.current_session_time_path(), epoch_secs)
    }

    /// `true` if no session file exists yet, or the gap since the last
    /// recorded session time exceeds `idle_threshold_secs` (spec.md §4.4
    /// "Session detection").
    pub fn is_new_session(&self, now_epoch_secs: u64, idle_threshold_secs: u64) -> bool {
        let last = self.current_session_time();
        last == 0 || now_epoch_secs.saturating_sub(last) > idle_threshold_secs
    }

    /// Refreshes the heartbeat file's mtime by rewriting it with the
    /// current tick marker.
    pub fn beat_heartbeat(&self) -> Result<(), StateError> {
        self.ensure_dir()?;
        write_atomic_line(&self.heartbeat_path(), std::process::id() as u64)
    }

    pub fn heartbeat_age_secs(&self, now_epoch_secs: u64) -> Option<u64> {
        let meta = std::fs::metadata(self.heartbeat_path()).ok()?;
        let modified = meta.modified().ok()?;
        let modified_secs =
            modified.duration_since(std::time::UNIX_EPOCH).ok()?.as_secs();
        Some(now_epoch_secs.saturating_sub(modified_secs))
    }

    /// Writes `{pid}\n{command_marker}\n` for reuse-detection on read
    /// (spec.md §3 "State Files").
    pub fn write_pid_file(&self, role: &str, pid: u32, command_marker: &str) -> Result<(), StateError> {
        self.ensure_dir()?;
        let contents = format!("{pid}\n{command_marker}\n");
        write_atomic_string(&self.pid_path(role), &contents)
    }

    pub fn read_pid_file(&self, role: &str) -> Option<(u32, String)> {
        let contents = std::fs::read_to_string(self.pid_path(role)).ok()?;
        let mut lines = contents.lines();
        let pid = lines.next()?.parse().ok()?;
        let marker = lines.next().unwrap_or_default().to_string();
        Some((pid, marker))
    }

    pub fn remove_pid_file(&self, role: &str) -> Result<(), StateError> {
        let path = self.pid_path(role);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn read_epoch_secs(path: &Path) -> u64 {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn write_atomic_line(path: &Path, value: u64) -> Result<(), StateError> {
    write_atomic_string(path, &format!("{value}\n"))
}

fn write_atomic_string(path: &Path, contents: &str) -> Result<(), StateError> {
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "state_files_tests.rs"]
mod tests;
