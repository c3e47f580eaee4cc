// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! checkpoint-watchdog: the cross-project supervisor binary (spec.md §4.7
//! "Watchdog"). Unlike the Periodic Agent, this runs as a single long-lived
//! process (one per user, not one per project) since its job is to sweep
//! every registered project's heartbeat on a fixed cadence and restart
//! whichever have gone stale.

use std::path::PathBuf;
use std::time::Duration;

use checkpoint_platform::{default_daemon_manager, DesktopNotifyAdapter};
use checkpoint_scheduler::{notify_gate::QuietHours, Watchdog};
use checkpoint_state::{Config, StateRoot};
use tokio::signal::unix::{signal, SignalKind};

const CHECK_INTERVAL: Duration = Duration::from_secs(60);

fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHECKPOINT_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(dir) = dirs::state_dir() {
        return dir.join("checkpoint");
    }
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".local/state/checkpoint")
}

fn agents_dir(state_root: &StateRoot) -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir().unwrap_or_else(|| state_root.path().to_path_buf()).join("Library/LaunchAgents")
    }
    #[cfg(target_os = "linux")]
    {
        dirs::config_dir()
            .unwrap_or_else(|| state_root.path().to_path_buf())
            .join("systemd/user")
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        state_root.path().join("agents")
    }
}

fn setup_logging(state_root: &StateRoot) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = state_root.logs_dir();
    let _ = std::fs::create_dir_all(&logs_dir);
    let file_appender = tracing_appender::rolling::never(&logs_dir, "watchdog.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();
    guard
}

fn global_notify_settings(state_root: &StateRoot) -> (Option<QuietHours>, u64) {
    let cfg = std::fs::read_to_string(state_root.path().join("config.yaml"))
        .ok()
        .and_then(|text| Config::load_str(&text).ok())
        .unwrap_or_else(Config::defaults);
    let quiet_hours = cfg.get_string("quiet_hours").and_then(|s| QuietHours::parse(&s));
    let repeat_after_hours = cfg.get_int("notify_repeat_after_hours").unwrap_or(4).max(1) as u64;
    (quiet_hours, repeat_after_hours)
}

#[tokio::main]
async fn main() {
    let state_root = StateRoot::new(state_dir());
    let _log_guard = setup_logging(&state_root);

    let daemon = default_daemon_manager(agents_dir(&state_root));
    let notify = DesktopNotifyAdapter::new();
    let (quiet_hours, repeat_after_hours) = global_notify_settings(&state_root);

    tracing::info!("checkpoint watchdog starting");
    println!("READY");

    let watchdog = Watchdog::new(state_root, ArcDaemon(daemon.into()), notify, quiet_hours, repeat_after_hours);

    let mut sigterm = signal(SignalKind::terminate()).expect("install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("install SIGINT handler");
    let mut interval = tokio::time::interval(CHECK_INTERVAL);

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                tracing::info!("received SIGINT, shutting down");
                break;
            }
            _ = interval.tick() => {
                match watchdog.check_all().await {
                    Ok(results) => {
                        for (project_id, outcome) in results {
                            tracing::debug!(project_id = %project_id, ?outcome, "watchdog check");
                        }
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "watchdog sweep failed");
                    }
                }
            }
        }
    }

    tracing::info!("checkpoint watchdog stopped");
}

/// Adapts a boxed `dyn DaemonManager` to the concrete-generic `Watchdog`.
struct ArcDaemon(std::sync::Arc<dyn checkpoint_platform::DaemonManager>);

#[async_trait::async_trait]
impl checkpoint_platform::DaemonManager for ArcDaemon {
    async fn install_agent(
        &self,
        project: &checkpoint_core::ProjectId,
        script: &str,
        env: &[(String, String)],
        interval_secs: u64,
    ) -> Result<(), checkpoint_platform::PlatformError> {
        self.0.install_agent(project, script, env, interval_secs).await
    }

    async fn remove_agent(&self, project: &checkpoint_core::ProjectId) -> Result<(), checkpoint_platform::PlatformError> {
        self.0.remove_agent(project).await
    }

    async fn start_agent(&self, project: &checkpoint_core::ProjectId) -> Result<(), checkpoint_platform::PlatformError> {
        self.0.start_agent(project).await
    }

    async fn stop_agent(&self, project: &checkpoint_core::ProjectId) -> Result<(), checkpoint_platform::PlatformError> {
        self.0.stop_agent(project).await
    }

    async fn status_agent(&self, project: &checkpoint_core::ProjectId) -> checkpoint_platform::AgentStatus {
        self.0.status_agent(project).await
    }
}
