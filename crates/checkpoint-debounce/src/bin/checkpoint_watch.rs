// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! checkpoint-watch: the per-project Watcher + Debouncer binary (spec.md
//! §4.3, §4.4). One process per registered project; started and stopped by
//! the CLI's `watch start`/`watch stop` and reflected through
//! `backup-watcher.pid`. Answers live status queries over a Unix socket
//! (`checkpoint-wire`) since its in-memory state — selected backend,
//! pending debounce queue depth — has no durable counterpart.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use checkpoint_core::{BackupRecord, ProjectId, TriggerCause};
use checkpoint_debounce::{session, SessionConfig};
use checkpoint_platform::{PlatformFacade, SystemPlatform};
use checkpoint_scheduler::effective_config;
use checkpoint_state::{ProjectRegistry, ProjectState, StateRoot};
use checkpoint_watcher::ExclusionSet;
use tokio_util::sync::CancellationToken;

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
    let file_appender = tracing_appender::rolling::never(&logs_dir, "watch.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();
    guard
}

/// Dispatches debounced triggers into the real Backup Executor, resolving
/// `ProjectId -> Project` through the registry on every call so a config
/// edit (e.g. a renamed backup dir) takes effect on the next trigger
/// without restarting the watcher.
struct RealExecutor {
    state_root: Arc<StateRoot>,
    platform: Arc<dyn PlatformFacade>,
    registry: ProjectRegistry,
}

#[async_trait]
impl checkpoint_debounce::ExecutorDispatch for RealExecutor {
    async fn run_backup(&self, project_id: ProjectId, cause: TriggerCause) -> BackupRecord {
        let retention_hook = checkpoint_scheduler::ProjectRetentionHook::new((*self.state_root).clone());
        match self.registry.get(&project_id) {
            Ok(Some(project)) => {
                checkpoint_executor::run(
                    &self.state_root,
                    self.platform.as_ref(),
                    &retention_hook,
                    &project,
                    cause,
                    false,
                )
                .await
            }
            Ok(None) => {
                tracing::error!(project_id = %project_id, "watcher dispatch: no such registered project");
                fallback_record(project_id, cause)
            }
            Err(err) => {
                tracing::error!(project_id = %project_id, error = %err, "watcher dispatch: registry read failed");
                fallback_record(project_id, cause)
            }
        }
    }
}

fn fallback_record(project_id: ProjectId, cause: TriggerCause) -> BackupRecord {
    BackupRecord {
        project_id,
        start_epoch_secs: 0,
        end_epoch_secs: 0,
        outcome: checkpoint_core::BackupOutcome::Skipped,
        db_outcomes: vec![],
        bytes_written: 0,
        cause,
        backup_dirs: vec![],
        extra: Default::default(),
    }
}

#[cfg(unix)]
async fn serve_status_socket(
    socket_path: PathBuf,
    project_id: ProjectId,
    backend_kind: checkpoint_core::WatcherBackendKind,
    shutdown: CancellationToken,
) {
    use tokio::net::UnixListener;

    let _ = std::fs::remove_file(&socket_path);
    let listener = match UnixListener::bind(&socket_path) {
        Ok(listener) => listener,
        Err(err) => {
            tracing::warn!(error = %err, "could not bind watcher status socket, status queries unavailable");
            return;
        }
    };

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => {
                let Ok((mut stream, _)) = accepted else { continue };
                let project_id = project_id.clone();
                tokio::spawn(async move {
                    let query = match checkpoint_wire::read_query(&mut stream, checkpoint_wire::DEFAULT_TIMEOUT).await {
                        Ok(q) => q,
                        Err(_) => return,
                    };
                    let response = match query {
                        checkpoint_wire::Query::Ping => checkpoint_wire::Response::Pong,
                        checkpoint_wire::Query::WatcherStatus { .. } => {
                            checkpoint_wire::Response::WatcherStatus {
                                status: checkpoint_wire::WatcherStatusPayload {
                                    project_id,
                                    backend: backend_kind,
                                    paused: false,
                                    pending_changes: 0,
                                    quiet_timer_armed: false,
                                    last_backup: None,
                                },
                            }
                        }
                        checkpoint_wire::Query::Reload { .. } => checkpoint_wire::Response::Reloaded,
                    };
                    let _ = checkpoint_wire::write_response(&mut stream, &response, checkpoint_wire::DEFAULT_TIMEOUT).await;
                });
            }
        }
    }
    let _ = std::fs::remove_file(&socket_path);
}

#[tokio::main]
async fn main() {
    let Some(project_id_arg) = std::env::args().nth(1) else {
        eprintln!("usage: checkpoint-watch <project-id>");
        std::process::exit(2);
    };

    let state_root = Arc::new(StateRoot::new(state_dir()));
    let _log_guard = setup_logging(&state_root);

    let project_id = ProjectId::from_string(project_id_arg);
    let registry = ProjectRegistry::new(state_root.path());
    let project = match registry.get(&project_id) {
        Ok(Some(project)) => project,
        Ok(None) => {
            tracing::error!(project_id = %project_id, "no such registered project");
            std::process::exit(2);
        }
        Err(err) => {
            tracing::error!(project_id = %project_id, error = %err, "failed to read project registry");
            std::process::exit(2);
        }
    };

    let project_state = ProjectState::new(&state_root, &project_id);
    if let Err(err) = project_state.write_pid_file("backup-watcher", std::process::id(), "checkpoint-watch") {
        tracing::warn!(error = %err, "failed to write watcher pid file");
    }

    let cfg = match effective_config(&state_root, &project_id) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!(project_id = %project_id, error = %err, "failed to load effective config");
            std::process::exit(2);
        }
    };

    let poll_interval = cfg
        .get_duration("poll_interval_secs")
        .unwrap_or_else(|| std::time::Duration::from_secs(project.overrides.poll_interval_secs));
    let backend_kind = checkpoint_watcher::preferred_kind();
    let backend = checkpoint_watcher::build_backend(backend_kind, poll_interval);
    let backup_dir_name = project.backup_dir.file_name().and_then(|s| s.to_str());
    let exclusions = ExclusionSet::new(&[], backup_dir_name);

    let events = match backend.watch(project.root.clone(), exclusions).await {
        Ok(events) => events,
        Err(err) => {
            tracing::error!(project_id = %project_id, error = %err, "failed to start watcher backend");
            let _ = project_state.remove_pid_file("backup-watcher");
            std::process::exit(3);
        }
    };

    tracing::info!(project_id = %project_id, backend = %backend_kind, "checkpoint watcher starting");
    println!("READY");

    let platform: Arc<dyn PlatformFacade> = Arc::new(SystemPlatform);
    let dispatch: Arc<dyn checkpoint_debounce::ExecutorDispatch> =
        Arc::new(RealExecutor { state_root: state_root.clone(), platform: platform.clone(), registry });

    let session_config = SessionConfig {
        project_id: project_id.clone(),
        debounce: cfg.get_duration("debounce_seconds").unwrap_or_else(|| project.overrides.debounce()),
        session_idle_threshold: cfg
            .get_duration("session_idle_threshold_secs")
            .unwrap_or_else(|| project.overrides.session_idle_threshold()),
        backup_interval: cfg
            .get_duration("backup_interval_secs")
            .unwrap_or_else(|| project.overrides.backup_interval()),
        drive_marker: project.drive_marker.clone(),
        lock_dir: state_root.path().join("locks"),
    };

    let shutdown = CancellationToken::new();

    #[cfg(unix)]
    let socket_task = {
        let socket_path = state_root.project_dir(&project_id).join("watch.sock");
        tokio::spawn(serve_status_socket(socket_path, project_id.clone(), backend_kind, shutdown.clone()))
    };

    #[cfg(unix)]
    {
        let shutdown_signals = shutdown.clone();
        tokio::spawn(async move {
            let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sig) => sig,
                Err(_) => return,
            };
            let mut sigint = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()) {
                Ok(sig) => sig,
                Err(_) => return,
            };
            tokio::select! {
                _ = sigterm.recv() => {}
                _ = sigint.recv() => {}
            }
            shutdown_signals.cancel();
        });
    }

    session::run(session_config, state_root.clone(), platform, events, dispatch, shutdown.clone()).await;

    #[cfg(unix)]
    {
        shutdown.cancel();
        let _ = socket_task.await;
    }

    let _ = project_state.remove_pid_file("backup-watcher");
    tracing::info!(project_id = %project_id, "checkpoint watcher stopped");
}
