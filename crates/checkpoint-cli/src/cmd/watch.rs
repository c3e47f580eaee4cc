// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint watch {start|stop|status}` — manage the per-project Watcher
//! process (spec.md §6).

use clap::{Args, Subcommand};

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct WatchArgs {
    #[command(subcommand)]
    pub command: WatchCommand,
}

#[derive(Subcommand)]
pub enum WatchCommand {
    Start,
    Stop,
    Status,
}

pub async fn run(args: WatchArgs, ctx: &Context, format: OutputFormat) -> Result<(), ExitError> {
    let cwd = std::env::current_dir().map_err(|e| ExitError::new(3, e.to_string()))?;
    let project = ctx
        .current_project(&cwd)
        .map_err(|e| ExitError::new(3, e.to_string()))?
        .ok_or_else(|| ExitError::new(3, "current directory is not a registered project"))?;

    match args.command {
        WatchCommand::Start => start(ctx, &project).await,
        WatchCommand::Stop => stop(ctx, &project).await,
        WatchCommand::Status => status(ctx, &project, format).await,
    }
}

fn pid_file(ctx: &Context, project: &checkpoint_core::Project) -> (checkpoint_state::ProjectState, Option<(u32, String)>) {
    let state = checkpoint_state::ProjectState::new(&ctx.state_root, &project.id);
    let pid = state.read_pid_file("backup-watcher");
    (state, pid)
}

async fn start(ctx: &Context, project: &checkpoint_core::Project) -> Result<(), ExitError> {
    let (_, existing) = pid_file(ctx, project);
    if let Some((pid, _)) = existing {
        if ctx.platform.pid_alive(pid) {
            return Err(ExitError::new(1, format!("watcher already running (pid {pid})")));
        }
    }

    let exe = std::env::current_exe()
        .map_err(|e| ExitError::new(3, e.to_string()))?
        .with_file_name("checkpoint-watch");

    tokio::process::Command::new(&exe)
        .arg(project.id.to_string())
        .env("CHECKPOINT_STATE_DIR", ctx.state_root.path())
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ExitError::new(3, format!("failed to spawn {}: {e}", exe.display())))?;

    println!("watcher starting for '{}'", project.name);
    Ok(())
}

async fn stop(ctx: &Context, project: &checkpoint_core::Project) -> Result<(), ExitError> {
    let (state, existing) = pid_file(ctx, project);
    let Some((pid, _)) = existing else {
        return Err(ExitError::new(1, "watcher is not running"));
    };
    if !ctx.platform.pid_alive(pid) {
        let _ = state.remove_pid_file("backup-watcher");
        return Err(ExitError::new(1, "watcher is not running"));
    }

    #[cfg(unix)]
    {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;
        kill(Pid::from_raw(pid as i32), Signal::SIGTERM)
            .map_err(|e| ExitError::new(3, format!("failed to signal pid {pid}: {e}")))?;
    }
    #[cfg(not(unix))]
    {
        return Err(ExitError::new(3, "stopping the watcher is only supported on unix"));
    }

    println!("watcher stopping for '{}'", project.name);
    Ok(())
}

async fn status(ctx: &Context, project: &checkpoint_core::Project, format: OutputFormat) -> Result<(), ExitError> {
    let (_, existing) = pid_file(ctx, project);
    let running = existing.as_ref().is_some_and(|(pid, _)| ctx.platform.pid_alive(*pid));

    let live_status = if running {
        query_live_status(ctx, &project.id).await
    } else {
        None
    };

    crate::output::format_or_json(
        format,
        &serde_json::json!({
            "project_id": project.id.to_string(),
            "running": running,
            "pid": existing.map(|(pid, _)| pid),
            "live": live_status,
        }),
        || {
            if running {
                println!("watcher {} for '{}'", crate::color::literal("running"), project.name);
                if let Some(status) = &live_status {
                    println!(
                        "{}",
                        crate::color::context(&format!(
                            "  backend: {}  pending: {}  paused: {}",
                            status.backend, status.pending_changes, status.paused
                        ))
                    );
                }
            } else {
                println!("watcher {} for '{}'", crate::color::muted("not running"), project.name);
            }
        },
    )
    .map_err(|e| ExitError::new(1, e.to_string()))
}

async fn query_live_status(
    ctx: &Context,
    project_id: &checkpoint_core::ProjectId,
) -> Option<checkpoint_wire::WatcherStatusPayload> {
    #[cfg(unix)]
    {
        let socket_path = ctx.state_root.project_dir(project_id).join("watch.sock");
        let mut stream = tokio::net::UnixStream::connect(&socket_path).await.ok()?;
        checkpoint_wire::write_query(
            &mut stream,
            &checkpoint_wire::Query::WatcherStatus { project_id: project_id.clone() },
            checkpoint_wire::DEFAULT_TIMEOUT,
        )
        .await
        .ok()?;
        match checkpoint_wire::read_response(&mut stream, checkpoint_wire::DEFAULT_TIMEOUT).await.ok()? {
            checkpoint_wire::Response::WatcherStatus { status } => Some(status),
            _ => None,
        }
    }
    #[cfg(not(unix))]
    {
        let _ = (ctx, project_id);
        None
    }
}
