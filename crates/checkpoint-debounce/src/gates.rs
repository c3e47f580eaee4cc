// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four ordered gates a trigger must clear before dispatch (spec.md
//! §4.4). Evaluated in order; the first failure short-circuits the rest.

use checkpoint_platform::PlatformFacade;
use checkpoint_state::{ProjectState, StateRoot};

/// Why a trigger did not reach the Executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateFailure {
    Paused,
    DriveMarkerMissing,
    IntervalNotElapsed,
    LockContended,
}

/// Inputs a gate check needs, gathered once per evaluation so the call
/// site reads as a flat list matching spec.md §4.4's numbered gates.
pub struct GateInputs<'a> {
    pub state_root: &'a StateRoot,
    pub project_state: &'a ProjectState,
    pub drive_marker: Option<&'a std::path::Path>,
    pub backup_interval_secs: u64,
    pub now_epoch_secs: u64,
    /// Bypasses gate 3 (interval) — set for force-triggers and new-session
    /// triggers (spec.md §4.4 "Session detection").
    pub bypass_interval: bool,
}

/// Evaluates gates 1–3 (pause, drive-marker, interval). Gate 4 (lock) is
/// evaluated separately at dispatch time since acquiring it is the
/// Executor's own first step (spec.md §4.5 step 1) — re-checking it here
/// would just be a second, redundant acquire-then-release.
pub fn evaluate(inputs: &GateInputs<'_>) -> Result<(), GateFailure> {
    if inputs.state_root.is_paused() {
        return Err(GateFailure::Paused);
    }
    if let Some(marker) = inputs.drive_marker {
        if !marker.exists() {
            return Err(GateFailure::DriveMarkerMissing);
        }
    }
    if !inputs.bypass_interval {
        let last = inputs.project_state.last_backup_time();
        let elapsed = inputs.now_epoch_secs.saturating_sub(last);
        if elapsed < inputs.backup_interval_secs {
            return Err(GateFailure::IntervalNotElapsed);
        }
    }
    Ok(())
}

/// Checks gate 4 (the backup lock) without holding it — used only for
/// status reporting and tests; the Executor performs the real acquire.
pub fn lock_available(lock_dir: &std::path::Path, name: &str, platform: &dyn PlatformFacade) -> bool {
    match checkpoint_platform::acquire_lock(lock_dir, name, platform) {
        Ok(_guard) => true,
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "gates_tests.rs"]
mod tests;
