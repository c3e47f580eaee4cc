// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An advisory, process-scoped mutex keyed by operation name (spec.md §3,
//! "Lock" data model). Backed by `fs2`'s cross-platform exclusive file lock
//! plus an on-disk marker recording the owning PID, so a lock left behind by
//! a process that has since died can be reclaimed instead of wedging every
//! future backup for that project.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::PlatformError;
use crate::platform::PlatformFacade;

/// A held advisory lock. Releasing happens on `Drop`, mirroring the
/// teacher's deferred-cleanup-runs-once pattern: callers don't need to
/// remember to unlock on every exit path, including early returns and
/// panics unwinding through the guard.
pub struct LockGuard {
    file: File,
    marker_path: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        let _ = std::fs::remove_file(&self.marker_path);
    }
}

/// Acquires the named lock under `lock_dir`, failing fast (non-blocking)
/// rather than queueing behind another process. If the existing marker
/// names a PID that `platform` reports as dead, the stale lock is reclaimed
/// and acquisition retried once.
pub fn acquire(
    lock_dir: &Path,
    name: &str,
    platform: &dyn PlatformFacade,
) -> Result<LockGuard, PlatformError> {
    std::fs::create_dir_all(lock_dir)?;
    let lock_path = lock_dir.join(format!("{name}.lock"));
    let marker_path = lock_dir.join(format!("{name}.owner"));

    match try_acquire(&lock_path, &marker_path) {
        Ok(guard) => Ok(guard),
        Err(PlatformError::LockContended { .. }) => {
            if is_stale(&marker_path, platform) {
                let _ = std::fs::remove_file(&marker_path);
                try_acquire(&lock_path, &marker_path)
            } else {
                Err(PlatformError::LockContended { name: name.to_string() })
            }
        }
        Err(other) => Err(other),
    }
}

fn try_acquire(lock_path: &Path, marker_path: &Path) -> Result<LockGuard, PlatformError> {
    let file = OpenOptions::new().create(true).write(true).open(lock_path)?;
    match file.try_lock_exclusive() {
        Ok(()) => {
            let mut marker = File::create(marker_path)?;
            write!(marker, "{}", std::process::id())?;
            Ok(LockGuard { file, marker_path: marker_path.to_path_buf() })
        }
        Err(_) => Err(PlatformError::LockContended {
            name: lock_path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default(),
        }),
    }
}

pub(crate) fn is_stale(marker_path: &Path, platform: &dyn PlatformFacade) -> bool {
    let Ok(mut file) = File::open(marker_path) else {
        // No marker at all but the OS lock was held: either a concurrent
        // acquire is mid-flight, or the marker write never happened. Treat
        // as not stale so we don't race a legitimate holder.
        return false;
    };
    let mut contents = String::new();
    if file.read_to_string(&mut contents).is_err() {
        return false;
    }
    match contents.trim().parse::<u32>() {
        Ok(pid) => !platform.pid_alive(pid),
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
