// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! checkpoint-agent: the per-project Periodic Agent binary (spec.md §4.7).
//!
//! Invoked by the host service manager (launchd's `StartInterval`, systemd's
//! `OnUnitActiveSec` timer) once per interval as a one-shot process: write
//! heartbeat, evaluate gates, run one Executor pass if clear, exit. The
//! service manager owns the scheduling; this binary owns a single tick.

use std::path::PathBuf;

use checkpoint_core::ProjectId;
use checkpoint_platform::SystemPlatform;
use checkpoint_scheduler::{agent_tick, ProjectRetentionHook};
use checkpoint_state::{ProjectRegistry, StateRoot};

fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHECKPOINT_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(dir) = dirs::state_dir() {
        return dir.join("checkpoint");
    }
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".local/state/checkpoint")
}

fn setup_logging(state_root: &StateRoot) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = state_root.logs_dir();
    let _ = std::fs::create_dir_all(&logs_dir);
    let file_appender = tracing_appender::rolling::never(&logs_dir, "agent.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();
    guard
}

#[tokio::main]
async fn main() {
    let Some(project_id_arg) = std::env::args().nth(1) else {
        eprintln!("usage: checkpoint-agent <project-id>");
        std::process::exit(2);
    };

    let state_root = StateRoot::new(state_dir());
    let _log_guard = setup_logging(&state_root);

    let project_id = ProjectId::from_string(project_id_arg);
    let registry = ProjectRegistry::new(state_root.path());
    let project = match registry.get(&project_id) {
        Ok(Some(project)) => project,
        Ok(None) => {
            tracing::error!(project_id = %project_id, "no such registered project");
            std::process::exit(1);
        }
        Err(err) => {
            tracing::error!(project_id = %project_id, error = %err, "failed to read project registry");
            std::process::exit(1);
        }
    };

    let platform = SystemPlatform;
    let retention_hook = ProjectRetentionHook::new(state_root.clone());

    match agent_tick(&state_root, &platform, &retention_hook, &project).await {
        Ok(Some(record)) => {
            tracing::info!(project_id = %project_id, outcome = %record.outcome, "tick complete");
        }
        Ok(None) => {
            tracing::debug!(project_id = %project_id, "tick produced no record");
        }
        Err(reason) => {
            tracing::debug!(project_id = %project_id, ?reason, "tick gated");
        }
    }
}
