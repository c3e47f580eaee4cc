// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint daemon-schedule` — install or remove the periodic background
//! agent for the current project (spec.md §6).

use clap::Args;

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct DaemonScheduleArgs {
    /// Install the periodic agent.
    #[arg(long)]
    pub install: bool,
    /// Remove the periodic agent.
    #[arg(long)]
    pub remove: bool,
    /// Interval in seconds between scheduled runs.
    #[arg(long, default_value_t = 3600)]
    pub interval: u64,
}

pub async fn run(args: DaemonScheduleArgs, ctx: &Context, format: OutputFormat) -> Result<(), ExitError> {
    if args.install == args.remove {
        return Err(ExitError::new(3, "exactly one of --install or --remove is required"));
    }

    let cwd = std::env::current_dir().map_err(|e| ExitError::new(3, e.to_string()))?;
    let project = ctx
        .current_project(&cwd)
        .map_err(|e| ExitError::new(3, e.to_string()))?
        .ok_or_else(|| ExitError::new(3, "current directory is not a registered project"))?;

    let agents_dir = ctx.state_root.path().join("agents");
    let manager = checkpoint_platform::default_daemon_manager(agents_dir);

    if args.remove {
        manager
            .remove_agent(&project.id)
            .await
            .map_err(|e| ExitError::new(3, e.to_string()))?;
        return crate::output::format_or_json(
            format,
            &serde_json::json!({"project_id": project.id.to_string(), "removed": true}),
            || println!("removed scheduled agent for '{}'", project.name),
        )
        .map_err(|e| ExitError::new(1, e.to_string()));
    }

    let exe = std::env::current_exe()
        .map_err(|e| ExitError::new(3, e.to_string()))?
        .with_file_name("checkpoint-agent");
    let script = format!("{} {}", exe.display(), project.id);
    let env = [("CHECKPOINT_STATE_DIR".to_string(), ctx.state_root.path().display().to_string())];

    manager
        .install_agent(&project.id, &script, &env, args.interval)
        .await
        .map_err(|e| ExitError::new(3, e.to_string()))?;

    crate::output::format_or_json(
        format,
        &serde_json::json!({
            "project_id": project.id.to_string(),
            "installed": true,
            "interval_secs": args.interval,
        }),
        || {
            println!(
                "installed scheduled agent for '{}' (every {}s)",
                project.name, args.interval
            )
        },
    )
    .map_err(|e| ExitError::new(1, e.to_string()))
}
