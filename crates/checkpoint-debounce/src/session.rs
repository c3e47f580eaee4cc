// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires one project's Watcher output into the trailing-edge debounce and
//! session-idle logic, dispatching to the Executor when gates clear
//! (spec.md §4.4).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use checkpoint_core::{ProjectId, TriggerCause};
use checkpoint_platform::PlatformFacade;
use checkpoint_state::{ProjectState, StateRoot};
use tokio_util::sync::CancellationToken;

use crate::dispatch::ExecutorDispatch;
use crate::gates::{self, GateFailure, GateInputs};
use crate::timer::QuietTimer;

/// Everything a running debounce loop needs that doesn't change per event.
pub struct SessionConfig {
    pub project_id: ProjectId,
    pub debounce: Duration,
    pub session_idle_threshold: Duration,
    pub backup_interval: Duration,
    pub drive_marker: Option<PathBuf>,
    pub lock_dir: PathBuf,
}

fn now_epoch_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// Drives one project's debounce loop until `events` closes or `shutdown`
/// fires. Consumes Change Events from a single Watcher (spec.md §4.4); the
/// Debouncer itself never blocks on the Executor — `dispatch` is awaited on
/// the same task, but gate evaluation and timer resets are cheap, and a
/// dispatch that's still contended on the lock (because a prior one is
/// still running) resolves quickly via `GateFailure::LockContended`/`IntervalNotElapsed`
/// rather than queueing work.
pub async fn run(
    config: SessionConfig,
    state_root: Arc<StateRoot>,
    platform: Arc<dyn PlatformFacade>,
    mut events: tokio::sync::mpsc::Receiver<checkpoint_core::ChangeEvent>,
    dispatch: Arc<dyn ExecutorDispatch>,
    shutdown: CancellationToken,
) {
    let project_state = ProjectState::new(&state_root, &config.project_id);
    let (timer, mut fired) = QuietTimer::new(config.debounce);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                timer.cancel();
                tracing::info!(project_id = %config.project_id, "debounce loop shutting down");
                break;
            }
            maybe_event = events.recv() => {
                match maybe_event {
                    Some(event) => {
                        let now = now_epoch_secs();
                        let is_new_session = project_state.is_new_session(
                            now,
                            config.session_idle_threshold.as_secs(),
                        );
                        let _ = project_state.set_current_session_time(now);

                        if event.is_catchup() || is_new_session {
                            tracing::info!(
                                project_id = %config.project_id,
                                catchup = event.is_catchup(),
                                new_session = is_new_session,
                                "immediate trigger bypassing interval gate"
                            );
                            try_dispatch(&config, &state_root, &project_state, &platform, &dispatch, TriggerCause::Session, true).await;
                        }
                        timer.reset(config.debounce);
                    }
                    None => {
                        tracing::warn!(project_id = %config.project_id, "watcher event channel closed");
                        break;
                    }
                }
            }
            Some(()) = fired.recv() => {
                try_dispatch(&config, &state_root, &project_state, &platform, &dispatch, TriggerCause::Watcher, false).await;
            }
        }
    }
}

async fn try_dispatch(
    config: &SessionConfig,
    state_root: &StateRoot,
    project_state: &ProjectState,
    platform: &Arc<dyn PlatformFacade>,
    dispatch: &Arc<dyn ExecutorDispatch>,
    cause: TriggerCause,
    bypass_interval: bool,
) {
    let inputs = GateInputs {
        state_root,
        project_state,
        drive_marker: config.drive_marker.as_deref(),
        backup_interval_secs: config.backup_interval.as_secs(),
        now_epoch_secs: now_epoch_secs(),
        bypass_interval,
    };
    if let Err(failure) = gates::evaluate(&inputs) {
        log_gate_failure(&config.project_id, failure);
        return;
    }
    if !gates::lock_available(&config.lock_dir, "backup", platform.as_ref()) {
        log_gate_failure(&config.project_id, GateFailure::LockContended);
        return;
    }

    tracing::info!(project_id = %config.project_id, %cause, "dispatching backup");
    let record = dispatch.run_backup(config.project_id.clone(), cause).await;
    tracing::info!(project_id = %config.project_id, outcome = %record.outcome, "backup dispatch returned");
}

fn log_gate_failure(project_id: &ProjectId, failure: GateFailure) {
    match failure {
        GateFailure::Paused | GateFailure::DriveMarkerMissing => {
            // Expected conditions per spec.md §7 — not logged as errors.
            tracing::debug!(project_id = %project_id, ?failure, "trigger suppressed by gate");
        }
        GateFailure::IntervalNotElapsed | GateFailure::LockContended => {
            tracing::debug!(project_id = %project_id, ?failure, "trigger deferred");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
