// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pre-flight checks (spec.md §4.5 steps 2-3): revalidate the pause sentinel
//! and drive marker the debounce loop already checked once (state can change
//! between gate evaluation and execution), then gate on disk usage.

use std::path::Path;

use checkpoint_platform::PlatformFacade;
use checkpoint_state::StateRoot;

use crate::error::ExecutorError;

#[derive(Debug, Clone, Copy)]
pub struct PreflightThresholds {
    pub warn_pct: u8,
    pub block_pct: u8,
}

/// Re-checks pause and drive-marker state, then the disk-usage gate. Returns
/// `Ok(true)` if the run should proceed with a warning already logged,
/// `Ok(false)` is never returned — every failure is an `Err`, matching the
/// Executor's "abort the whole run" contract for a failed pre-flight step.
pub fn run(
    state_root: &StateRoot,
    drive_verification_enabled: bool,
    drive_marker: Option<&Path>,
    backup_dir: &Path,
    thresholds: PreflightThresholds,
    platform: &dyn PlatformFacade,
) -> Result<(), ExecutorError> {
    if state_root.is_paused() {
        return Err(ExecutorError::Paused);
    }

    if drive_verification_enabled {
        let marker_present = drive_marker.map(|p| p.exists()).unwrap_or(false);
        if !marker_present {
            return Err(ExecutorError::DriveMarkerMissing);
        }
    }

    let pct = platform.disk_usage_pct(backup_dir)?;
    if pct >= thresholds.block_pct {
        return Err(ExecutorError::DiskCritical { pct });
    }
    if pct >= thresholds.warn_pct {
        tracing::warn!(pct, threshold = thresholds.warn_pct, "backup destination disk usage high");
    }
    Ok(())
}

#[cfg(test)]
#[path = "preflight_tests.rs"]
mod tests;
