// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Watchdog (spec.md §4.7 "Watchdog"): periodically checks every
//! registered project's Periodic Agent heartbeat. A heartbeat older than
//! `watchdog_missed_heartbeats` consecutive intervals triggers a restart
//! attempt via the platform's `DaemonManager`; repeated restart failures
//! escalate to a notification through the same quiet-hours/repeat-suppression
//! gate the rest of the scheduler uses.

use std::collections::HashMap;

use chrono::TimeZone;
use checkpoint_core::ProjectId;
use checkpoint_platform::{AgentStatus, DaemonManager, NotifyAdapter};
use checkpoint_state::{ProjectRegistry, StateRoot};
use parking_lot::Mutex;

use crate::config_load::effective_config;
use crate::error::SchedulerError;
use crate::notify_gate::{Alert, NotifyGate, QuietHours, Urgency};

/// Outcome of checking a single project this sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Healthy,
    Restarted,
    RestartFailed,
    NoHeartbeatYet,
}

pub struct Watchdog<D, N> {
    state_root: StateRoot,
    registry: ProjectRegistry,
    daemon: D,
    notify: N,
    gate: Mutex<NotifyGate>,
    consecutive_failures: Mutex<HashMap<ProjectId, u32>>,
}

impl<D, N> Watchdog<D, N>
where
    D: DaemonManager,
    N: NotifyAdapter,
{
    pub fn new(state_root: StateRoot, daemon: D, notify: N, quiet_hours: Option<QuietHours>, repeat_after_hours: u64) -> Self {
        let registry = ProjectRegistry::new(state_root.path());
        Self {
            state_root,
            registry,
            daemon,
            notify,
            gate: Mutex::new(NotifyGate::new(quiet_hours, repeat_after_hours)),
            consecutive_failures: Mutex::new(HashMap::new()),
        }
    }

    /// One sweep over every registered project.
    pub async fn check_all(&self) -> Result<Vec<(ProjectId, CheckOutcome)>, SchedulerError> {
        let mut results = Vec::new();
        for project in self.registry.list()? {
            let outcome = self.check_one(&project.id).await?;
            results.push((project.id, outcome));
        }
        Ok(results)
    }

    async fn check_one(&self, project_id: &ProjectId) -> Result<CheckOutcome, SchedulerError> {
        let project_state = checkpoint_state::ProjectState::new(&self.state_root, project_id);
        let now = now_epoch_secs();
        let Some(age) = project_state.heartbeat_age_secs(now) else {
            return Ok(CheckOutcome::NoHeartbeatYet);
        };

        let cfg = effective_config(&self.state_root, project_id)?;
        let interval = cfg.get_duration("backup_interval_secs").map(|d| d.as_secs()).unwrap_or(3600);
        let missed_allowed = cfg.get_int("watchdog_missed_heartbeats").unwrap_or(3).max(1) as u64;
        let threshold = interval.saturating_mul(missed_allowed);

        if age <= threshold {
            self.consecutive_failures.lock().remove(project_id);
            return Ok(CheckOutcome::Healthy);
        }

        tracing::warn!(project_id = %project_id, heartbeat_age_secs = age, threshold, "periodic agent missed heartbeats, restarting");

        match self.daemon.status_agent(project_id).await {
            AgentStatus::Running => {
                let _ = self.daemon.stop_agent(project_id).await;
            }
            AgentStatus::Stopped | AgentStatus::Unknown => {}
        }

        match self.daemon.start_agent(project_id).await {
            Ok(()) => {
                self.consecutive_failures.lock().remove(project_id);
                Ok(CheckOutcome::Restarted)
            }
            Err(err) => {
                let failures = {
                    let mut map = self.consecutive_failures.lock();
                    let count = map.entry(project_id.clone()).or_insert(0);
                    *count += 1;
                    *count
                };
                tracing::error!(project_id = %project_id, error = %err, failures, "watchdog restart attempt failed");
                self.maybe_notify_restart_failure(project_id, failures, now).await;
                Ok(CheckOutcome::RestartFailed)
            }
        }
    }

    async fn maybe_notify_restart_failure(&self, project_id: &ProjectId, failures: u32, now_epoch_secs: u64) {
        let alert = Alert {
            urgency: Urgency::Critical,
            title: "checkpoint agent restart failed".into(),
            body: format!("project {project_id} has failed to restart {failures} time(s) in a row"),
            project_id: project_id.to_string(),
            category: "watchdog_restart".into(),
        };
        let now = chrono::Local
            .timestamp_opt(now_epoch_secs as i64, 0)
            .single()
            .unwrap_or_else(chrono::Local::now);
        let should_send = self.gate.lock().should_deliver(&alert, now);
        if should_send {
            if let Err(err) = self.notify.notify(&alert.title, &alert.body).await {
                tracing::warn!(error = %err, "failed to deliver watchdog notification");
            }
        }
    }
}

fn now_epoch_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
