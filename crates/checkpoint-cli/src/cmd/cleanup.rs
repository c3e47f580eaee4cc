// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint cleanup` — run the retention engine against the current
//! project's backup directory (spec.md §6, §4.7).

use clap::Args;

use checkpoint_scheduler::{preview_backup_dir, sweep_backup_dir, RetentionPolicy};

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct CleanupArgs {
    /// Actually delete. Without this flag cleanup only previews.
    #[arg(long)]
    pub execute: bool,
    /// Override every bucket's time-based-days rule.
    #[arg(long)]
    pub age: Option<u32>,
    /// Override every bucket's size-based-mb rule.
    #[arg(long)]
    pub size: Option<u64>,
}

pub async fn run(args: CleanupArgs, ctx: &Context, format: OutputFormat) -> Result<(), ExitError> {
    let cwd = std::env::current_dir().map_err(|e| ExitError::new(1, e.to_string()))?;
    let project = ctx
        .current_project(&cwd)
        .map_err(|e| ExitError::new(1, e.to_string()))?
        .ok_or_else(|| ExitError::new(1, "current directory is not a registered project"))?;

    let cfg = checkpoint_scheduler::effective_config(&ctx.state_root, &project.id)
        .map_err(|e| ExitError::new(1, e.to_string()))?;
    let mut policy = RetentionPolicy::from_config(&cfg);
    if let Some(age) = args.age {
        policy.databases.time_based_days = age;
        policy.files.time_based_days = age;
    }
    if let Some(size) = args.size {
        policy.databases.size_based_mb = size;
        policy.files.size_based_mb = size;
    }

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let report = if args.execute {
        sweep_backup_dir(&project.backup_dir, &policy, now).map_err(|e| ExitError::new(1, e.to_string()))?
    } else {
        preview_backup_dir(&project.backup_dir, &policy, now)
    };

    crate::output::format_or_json(format, &report, || {
        let verb = if args.execute { "deleted" } else { "would delete" };
        if report.databases_deleted.is_empty() && report.files_deleted.is_empty() {
            println!("nothing to clean up");
            return;
        }
        for path in &report.databases_deleted {
            println!("{verb} {}", path.display());
        }
        for path in &report.files_deleted {
            println!("{verb} {}", path.display());
        }
    })
    .map_err(|e| ExitError::new(1, e.to_string()))
}
