// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PlatformFacade`: the single seam between Checkpoint's core logic and the
//! handful of OS-specific facts it needs (file metadata, and whether a PID is
//! still the process we think it is). Everything else in the workspace talks
//! to the filesystem directly; this module exists for the things that differ
//! across macOS and Linux or that need to be faked in tests.

use std::path::Path;
use std::time::SystemTime;

use crate::error::PlatformError;

/// A point-in-time snapshot of a file's size and modification time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size_bytes: u64,
    pub modified_epoch_secs: u64,
}

/// Abstraction over the bits of OS interaction that need to be faked in
/// tests: stat-ing files and checking whether a recorded PID is alive.
pub trait PlatformFacade: Send + Sync + 'static {
    fn stat(&self, path: &Path) -> Result<FileStat, PlatformError>;

    /// True if a process with this PID currently exists. Does not attempt to
    /// verify it's the *same* process that originally wrote the PID file;
    /// callers that care about staleness also compare a command-line marker.
    fn pid_alive(&self, pid: u32) -> bool;

    /// Best-effort lookup of the command line for a PID, used to confirm a
    /// recorded PID is still the process we expect (not a PID recycled by
    /// the OS for something unrelated). Returns `None` if the process is
    /// gone or the command line can't be read.
    fn command_line(&self, pid: u32) -> Option<String>;

    /// Percentage (0-100) of the filesystem containing `path` currently in
    /// use, rounded down. Backs the Executor's pre-flight disk-usage gate
    /// (spec.md §4.5 steps 2-3).
    fn disk_usage_pct(&self, path: &Path) -> Result<u8, PlatformError>;
}

fn epoch_secs(t: SystemTime) -> u64 {
    t.duration_since(SystemTime::UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// Real OS-backed implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlatform;

impl PlatformFacade for SystemPlatform {
    fn stat(&self, path: &Path) -> Result<FileStat, PlatformError> {
        let meta = std::fs::metadata(path)?;
        let modified = meta.modified().map(epoch_secs).unwrap_or(0);
        Ok(FileStat { size_bytes: meta.len(), modified_epoch_secs: modified })
    }

    #[cfg(unix)]
    fn pid_alive(&self, pid: u32) -> bool {
        // Signal 0 performs permission/existence checks without delivering
        // an actual signal, the conventional Unix liveness probe.
        nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), None).is_ok()
    }

    #[cfg(not(unix))]
    fn pid_alive(&self, _pid: u32) -> bool {
        false
    }

    #[cfg(target_os = "linux")]
    fn command_line(&self, pid: u32) -> Option<String> {
        let raw = std::fs::read(format!("/proc/{pid}/cmdline")).ok()?;
        if raw.is_empty() {
            return None;
        }
        Some(
            raw.split(|b| *b == 0)
                .filter(|s| !s.is_empty())
                .map(|s| String::from_utf8_lossy(s).into_owned())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    #[cfg(not(target_os = "linux"))]
    fn command_line(&self, pid: u32) -> Option<String> {
        let output = std::process::Command::new("ps")
            .args(["-o", "command=", "-p", &pid.to_string()])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn disk_usage_pct(&self, path: &Path) -> Result<u8, PlatformError> {
        // fs2 resolves the containing filesystem itself; the path need not
        // exist as long as some ancestor does, which `available_space`'s
        // underlying statvfs call tolerates on all three platforms.
        let total = fs2::total_space(path)?;
        let available = fs2::available_space(path)?;
        if total == 0 {
            return Ok(0);
        }
        let used = total.saturating_sub(available);
        let pct = (used as u128 * 100 / total as u128) as u8;
        Ok(pct.min(100))
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Debug, Default, Clone)]
    struct FakeState {
        stats: HashMap<std::path::PathBuf, FileStat>,
        alive_pids: std::collections::HashSet<u32>,
        command_lines: HashMap<u32, String>,
        disk_usage_pct: u8,
    }

    /// In-memory `PlatformFacade` for tests: every fact is seeded explicitly
    /// rather than read from the real filesystem or process table.
    #[derive(Clone, Default)]
    pub struct FakePlatform {
        inner: Arc<Mutex<FakeState>>,
    }

    impl FakePlatform {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_stat(&self, path: impl Into<std::path::PathBuf>, stat: FileStat) {
            self.inner.lock().stats.insert(path.into(), stat);
        }

        pub fn set_alive(&self, pid: u32, command_line: impl Into<String>) {
            let mut guard = self.inner.lock();
            guard.alive_pids.insert(pid);
            guard.command_lines.insert(pid, command_line.into());
        }

        pub fn kill(&self, pid: u32) {
            let mut guard = self.inner.lock();
            guard.alive_pids.remove(&pid);
            guard.command_lines.remove(&pid);
        }

        pub fn set_disk_usage_pct(&self, pct: u8) {
            self.inner.lock().disk_usage_pct = pct;
        }
    }

    impl PlatformFacade for FakePlatform {
        fn stat(&self, path: &Path) -> Result<FileStat, PlatformError> {
            self.inner.lock().stats.get(path).copied().ok_or_else(|| {
                PlatformError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no fake stat seeded for {}", path.display()),
                ))
            })
        }

        fn pid_alive(&self, pid: u32) -> bool {
            self.inner.lock().alive_pids.contains(&pid)
        }

        fn command_line(&self, pid: u32) -> Option<String> {
            self.inner.lock().command_lines.get(&pid).cloned()
        }

        fn disk_usage_pct(&self, _path: &Path) -> Result<u8, PlatformError> {
            Ok(self.inner.lock().disk_usage_pct)
        }
    }
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
