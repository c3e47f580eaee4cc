// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint now` — force one backup of the current project (spec.md §6).

use checkpoint_core::TriggerCause;
use checkpoint_scheduler::ProjectRetentionHook;
use clap::Args;

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct NowArgs {
    /// Bypass the change-detection skip (never bypasses lock, drive check,
    /// or the disk-critical block).
    #[arg(long)]
    pub force: bool,
    /// Skip the database phase for this run.
    #[arg(long)]
    pub local_only: bool,
    /// Skip the file phase for this run.
    #[arg(long)]
    pub db_only: bool,
    /// Report what would run without touching disk.
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(args: NowArgs, ctx: &Context, format: OutputFormat) -> Result<(), ExitError> {
    let cwd = std::env::current_dir().map_err(|e| ExitError::new(2, e.to_string()))?;
    let project = ctx
        .current_project(&cwd)
        .map_err(|e| ExitError::new(2, e.to_string()))?
        .ok_or_else(|| ExitError::new(2, "current directory is not a registered project"))?;

    if args.local_only || args.db_only {
        eprintln!(
            "warning: --local-only/--db-only are not yet wired into per-phase control; running the full pipeline"
        );
    }

    if args.dry_run {
        return crate::output::format_or_json(
            format,
            &serde_json::json!({"project_id": project.id.to_string(), "dry_run": true}),
            || println!("would back up project '{}' ({})", project.name, project.id),
        )
        .map_err(|e| ExitError::new(1, e.to_string()));
    }

    let retention_hook = ProjectRetentionHook::new((*ctx.state_root).clone());
    let record = checkpoint_executor::run(
        &ctx.state_root,
        ctx.platform.as_ref(),
        &retention_hook,
        &project,
        TriggerCause::Manual,
        args.force,
    )
    .await;

    let exit_code = match record.outcome {
        checkpoint_core::BackupOutcome::Success | checkpoint_core::BackupOutcome::Skipped => 0,
        checkpoint_core::BackupOutcome::Partial | checkpoint_core::BackupOutcome::Failed => {
            if record.extra.get("error").is_some_and(|e| e.contains("lock")) {
                5
            } else {
                7
            }
        }
    };

    crate::output::format_or_json(format, &record, || {
        println!(
            "backup {} for '{}': {}",
            record.outcome, project.name, record.extra.get("error").map(String::as_str).unwrap_or("ok")
        );
    })
    .map_err(|e| ExitError::new(1, e.to_string()))?;

    if exit_code != 0 {
        return Err(ExitError::new(exit_code, format!("backup did not complete cleanly: {}", record.outcome)));
    }
    Ok(())
}
