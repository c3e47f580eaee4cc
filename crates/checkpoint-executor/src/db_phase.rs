// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The database phase (spec.md §4.5 step 6): discover descriptors, decide
//! per-descriptor, run the dump, and fold in Docker's transient start/stop
//! lifecycle. Local (non-Docker) auto-start is a best-effort platform service
//! command — this pipeline has no DB client library to probe reachability
//! with, so "is it running" is answered by attempting the dump itself.

use std::path::Path;
use std::time::Duration;

use checkpoint_core::DbSubOutcome;
use checkpoint_db::{DatabaseDescriptor, Decision, DumpPolicy, Engine};

const DOCKER_READY_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Default)]
pub struct DbPhaseOutcome {
    pub sub_outcomes: Vec<DbSubOutcome>,
    pub bytes_written: u64,
}

pub async fn run(
    project_root: &Path,
    dest_dir: &Path,
    pid: u32,
    policy: DumpPolicy,
    connect_timeout: Duration,
    docker_cache_dir: &Path,
) -> DbPhaseOutcome {
    let mut outcome = DbPhaseOutcome::default();
    let descriptors = checkpoint_db::discover(project_root);
    let lifetime_flag = checkpoint_db::LifetimeFlag::new(docker_cache_dir);
    let mut docker_started_by_us = false;

    for descriptor in &descriptors {
        match checkpoint_db::decide(descriptor, policy) {
            Decision::Skip => {
                outcome.sub_outcomes.push(checkpoint_db::skipped_outcome(
                    descriptor,
                    "local database not running and auto_start_local_db disabled",
                ));
                continue;
            }
            Decision::Disabled => {
                outcome.sub_outcomes.push(checkpoint_db::skipped_outcome(
                    descriptor,
                    "disabled by config flag",
                ));
                continue;
            }
            Decision::Dump => {}
        }

        if let DatabaseDescriptor::Docker(_) = descriptor {
            if !checkpoint_db::docker::is_docker_running().await && policy.auto_start_docker {
                match checkpoint_db::docker::start_and_wait_ready(DOCKER_READY_TIMEOUT).await {
                    Ok(()) => {
                        let _ = lifetime_flag.mark_started();
                        docker_started_by_us = true;
                    }
                    Err(err) => {
                        outcome.sub_outcomes.push(failed_outcome(descriptor, &err.to_string()));
                        continue;
                    }
                }
            }
        }

        if let DatabaseDescriptor::Network(net) = descriptor {
            if net.is_local && policy.auto_start_local_db {
                ensure_local_service_started(net.engine).await;
            }
        }

        match checkpoint_db::dump(descriptor, dest_dir, pid, Some(connect_timeout)).await {
            Ok(dump_output) => {
                outcome.bytes_written += dump_output.bytes_written;
                outcome.sub_outcomes.push(DbSubOutcome {
                    descriptor_key: descriptor.dedup_key(),
                    outcome: checkpoint_core::BackupOutcome::Success,
                    bytes_written: dump_output.bytes_written,
                    detail: None,
                });
            }
            Err(err) => outcome.sub_outcomes.push(failed_outcome(descriptor, &err.to_string())),
        }

        if let DatabaseDescriptor::Network(net) = descriptor {
            if net.is_local && policy.auto_start_local_db && policy.stop_db_after_backup {
                ensure_local_service_stopped(net.engine).await;
            }
        }
    }

    if policy.backup_docker_databases
        && policy.stop_db_after_backup
        && docker_started_by_us
        && !lifetime_flag.we_started_and_still_running().await
    {
        // Another project's dump already tore it down between our start and
        // here; nothing left for us to stop.
    } else if docker_started_by_us && policy.stop_db_after_backup {
        let _ = checkpoint_db::docker::stop().await;
        let _ = lifetime_flag.clear();
    }

    outcome
}

fn failed_outcome(descriptor: &DatabaseDescriptor, detail: &str) -> DbSubOutcome {
    DbSubOutcome {
        descriptor_key: descriptor.dedup_key(),
        outcome: checkpoint_core::BackupOutcome::Failed,
        bytes_written: 0,
        detail: Some(detail.to_string()),
    }
}

/// Best-effort platform service start for a local, non-Docker database.
/// Failures are logged and otherwise ignored — the subsequent dump attempt
/// is the real signal of whether the engine ended up reachable.
async fn ensure_local_service_started(engine: Engine) {
    if let Some((program, args)) = local_service_command(engine, true) {
        if let Err(err) = tokio::process::Command::new(program).args(args).status().await {
            tracing::warn!(%engine, error = %err, "failed to start local database service");
        }
    }
}

async fn ensure_local_service_stopped(engine: Engine) {
    if let Some((program, args)) = local_service_command(engine, false) {
        if let Err(err) = tokio::process::Command::new(program).args(args).status().await {
            tracing::warn!(%engine, error = %err, "failed to stop local database service");
        }
    }
}

#[cfg(target_os = "macos")]
fn local_service_command(engine: Engine, start: bool) -> Option<(&'static str, Vec<&'static str>)> {
    let service = match engine {
        Engine::Postgres => "postgresql",
        Engine::Mysql => "mysql",
        Engine::Mongo => "mongodb-community",
        Engine::Sqlite => return None,
    };
    Some(("brew", vec!["services", if start { "start" } else { "stop" }, service]))
}

#[cfg(target_os = "linux")]
fn local_service_command(engine: Engine, start: bool) -> Option<(&'static str, Vec<&'static str>)> {
    let service = match engine {
        Engine::Postgres => "postgresql",
        Engine::Mysql => "mysql",
        Engine::Mongo => "mongod",
        Engine::Sqlite => return None,
    };
    Some(("systemctl", vec![if start { "start" } else { "stop" }, service]))
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn local_service_command(_engine: Engine, _start: bool) -> Option<(&'static str, Vec<&'static str>)> {
    None
}

#[cfg(test)]
#[path = "db_phase_tests.rs"]
mod tests;
