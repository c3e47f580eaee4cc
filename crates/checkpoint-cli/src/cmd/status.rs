// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint status` — health overview across every registered project
//! (spec.md §6).

use clap::Args;
use serde::Serialize;

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

/// A heartbeat older than this is considered stale for a project that has a
/// daemon or watcher PID file on record.
const STALE_HEARTBEAT_SECS: u64 = 600;

#[derive(Args)]
pub struct StatusArgs {
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ProjectStatus {
    project_id: String,
    name: String,
    paused: bool,
    last_backup_epoch_secs: u64,
    watcher_running: bool,
    daemon_running: bool,
    heartbeat_age_secs: Option<u64>,
    healthy: bool,
}

pub async fn run(args: StatusArgs, ctx: &Context, format: OutputFormat) -> Result<(), ExitError> {
    let projects = ctx.registry.list().map_err(|e| ExitError::new(6, e.to_string()))?;
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let global_paused = ctx.state_root.is_paused();

    let mut statuses = Vec::with_capacity(projects.len());
    for project in &projects {
        let state = checkpoint_state::ProjectState::new(&ctx.state_root, &project.id);
        let watcher_pid = state.read_pid_file("backup-watcher");
        let daemon_pid = state.read_pid_file("backup-daemon");
        let watcher_running = watcher_pid.is_some_and(|(pid, _)| ctx.platform.pid_alive(pid));
        let daemon_running = daemon_pid.is_some_and(|(pid, _)| ctx.platform.pid_alive(pid));
        let heartbeat_age_secs = state.heartbeat_age_secs(now);
        let last_backup_epoch_secs = state.last_backup_time();

        let heartbeat_stale = heartbeat_age_secs.is_some_and(|age| age > STALE_HEARTBEAT_SECS);
        let healthy = global_paused || !(heartbeat_stale && (watcher_running || daemon_running));

        statuses.push(ProjectStatus {
            project_id: project.id.to_string(),
            name: project.name.clone(),
            paused: global_paused,
            last_backup_epoch_secs,
            watcher_running,
            daemon_running,
            heartbeat_age_secs,
            healthy,
        });
    }

    let any_unhealthy = statuses.iter().any(|s| !s.healthy);

    crate::output::format_or_json(format, &statuses, || {
        if statuses.is_empty() {
            println!("no registered projects");
            return;
        }
        for s in &statuses {
            println!(
                "{}  last backup {}  watcher:{} daemon:{}  {}",
                crate::color::header(&s.name),
                crate::output::format_time_ago(s.last_backup_epoch_secs),
                if s.watcher_running { "up" } else { "down" },
                if s.daemon_running { "up" } else { "down" },
                if s.healthy { "ok" } else { "UNHEALTHY" },
            );
            if args.verbose {
                println!(
                    "{}",
                    crate::color::muted(&format!(
                        "  project_id: {}  heartbeat_age: {:?}s  paused: {}",
                        s.project_id, s.heartbeat_age_secs, s.paused
                    ))
                );
            }
        }
    })
    .map_err(|e| ExitError::new(1, e.to_string()))?;

    if any_unhealthy {
        return Err(ExitError::new(6, "one or more projects are unhealthy"));
    }
    Ok(())
}
