// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-project Periodic Agent (spec.md §4.7): "Runs on a fixed interval.
//! Each tick: write heartbeat, evaluate gates (§4.4 items 1-3), if clear,
//! invoke Executor with cause `interval`, write heartbeat again."

use std::time::Duration;

use checkpoint_core::{BackupRecord, Project, TriggerCause};
use checkpoint_debounce::gates::{self, GateFailure, GateInputs};
use checkpoint_executor::RetentionHook;
use checkpoint_platform::PlatformFacade;
use checkpoint_state::{ProjectState, StateRoot};
use tokio_util::sync::CancellationToken;

fn now_epoch_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// One tick: heartbeat, gate check, conditional Executor invocation,
/// heartbeat. Returns `Ok(None)` when a gate suppressed the run (not an
/// error — skipped ticks are the common case) or `Ok(Some(record))` when
/// the Executor actually ran.
pub async fn tick(
    state_root: &StateRoot,
    platform: &dyn PlatformFacade,
    retention_hook: &dyn RetentionHook,
    project: &Project,
) -> Result<Option<BackupRecord>, GateFailure> {
    let project_state = ProjectState::new(state_root, &project.id);
    let _ = project_state.beat_heartbeat();

    let now = now_epoch_secs();
    let inputs = GateInputs {
        state_root,
        project_state: &project_state,
        drive_marker: project.drive_marker.as_deref(),
        backup_interval_secs: project.overrides.backup_interval_secs,
        now_epoch_secs: now,
        bypass_interval: false,
    };
    gates::evaluate(&inputs)?;

    let record =
        checkpoint_executor::run(state_root, platform, retention_hook, project, TriggerCause::Interval, false).await;

    let _ = project_state.beat_heartbeat();
    Ok(Some(record))
}

/// Runs `tick` on a fixed interval until `shutdown` is cancelled.
pub async fn run_loop(
    state_root: &StateRoot,
    platform: &dyn PlatformFacade,
    retention_hook: &dyn RetentionHook,
    project: &Project,
    shutdown: CancellationToken,
) {
    let interval_secs = project.overrides.backup_interval_secs.max(1);
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!(project_id = %project.id, "periodic agent shutting down");
                return;
            }
            _ = interval.tick() => {
                match tick(state_root, platform, retention_hook, project).await {
                    Ok(Some(record)) => {
                        tracing::info!(project_id = %project.id, outcome = %record.outcome, "interval tick backed up");
                    }
                    Ok(None) => {}
                    Err(reason) => {
                        tracing::debug!(project_id = %project.id, ?reason, "interval tick gated");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
