// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mirror (spec.md §4.5 step 11): copy the backup directory to a configured
//! local cloud folder and/or hand it off to the remote store. Mirror
//! failures are non-fatal per-artifact; the caller downgrades the run's
//! outcome to `partial` rather than failing it outright.
//!
//! The remote mirror is an external collaborator specified only at its
//! boundary (spec.md §6): "an opaque copy-tree-to-remote command; receives
//! a source path and a destination URI." `rclone` is the closest thing to a
//! de facto standard for that contract, so it's what gets shelled out to —
//! mirroring the teacher's own pattern of treating an external tool as an
//! opaque subprocess rather than linking a client library for it.

use std::path::Path;

use tokio::process::Command;
use walkdir::WalkDir;

use crate::error::ExecutorError;
use crate::subprocess::{run_with_timeout, REMOTE_MIRROR_TIMEOUT};

#[derive(Debug, Clone, Default)]
pub struct MirrorOutcome {
    pub cloud_failed: bool,
    pub remote_failed: bool,
}

impl MirrorOutcome {
    pub fn any_failed(&self) -> bool {
        self.cloud_failed || self.remote_failed
    }
}

pub async fn mirror(
    backup_dir: &Path,
    cloud_dir: Option<&Path>,
    remote_uri: Option<&str>,
) -> MirrorOutcome {
    let mut outcome = MirrorOutcome::default();

    if let Some(cloud_dir) = cloud_dir {
        if let Err(err) = copy_tree(backup_dir, cloud_dir) {
            tracing::warn!(error = %err, "cloud-folder mirror failed");
            outcome.cloud_failed = true;
        }
    }

    if let Some(remote_uri) = remote_uri {
        if let Err(err) = remote_copy(backup_dir, remote_uri).await {
            tracing::warn!(error = %err, "remote mirror failed");
            outcome.remote_failed = true;
        }
    }

    outcome
}

fn copy_tree(source_root: &Path, dest_root: &Path) -> Result<(), ExecutorError> {
    for entry in WalkDir::new(source_root).into_iter() {
        let entry = entry.map_err(|e| ExecutorError::Io(e.into()))?;
        let relative = entry.path().strip_prefix(source_root).unwrap_or(entry.path());
        let dest = dest_root.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

async fn remote_copy(source_root: &Path, remote_uri: &str) -> Result<(), ExecutorError> {
    let mut cmd = Command::new("rclone");
    cmd.arg("copy").arg(source_root).arg(remote_uri);
    let output = run_with_timeout(cmd, REMOTE_MIRROR_TIMEOUT, "remote mirror copy").await?;
    if !output.status.success() {
        return Err(ExecutorError::Io(std::io::Error::other(format!(
            "rclone copy exited with {}",
            output.status
        ))));
    }
    Ok(())
}

#[cfg(test)]
#[path = "mirror_tests.rs"]
mod tests;
