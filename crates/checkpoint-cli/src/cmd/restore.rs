// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint restore` — not implemented here. Restoring from a backup is
//! an operator-driven, project-specific procedure (spec.md §6 marks it an
//! external collaborator, not core), so this command only points at where
//! the artifacts live.

use clap::Args;

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct RestoreArgs {}

pub async fn run(_args: RestoreArgs, ctx: &Context, format: OutputFormat) -> Result<(), ExitError> {
    let cwd = std::env::current_dir().map_err(|e| ExitError::new(1, e.to_string()))?;
    let project = ctx
        .current_project(&cwd)
        .map_err(|e| ExitError::new(1, e.to_string()))?
        .ok_or_else(|| ExitError::new(1, "current directory is not a registered project"))?;

    crate::output::format_or_json(
        format,
        &serde_json::json!({"project_id": project.id.to_string(), "backup_dir": project.backup_dir}),
        || {
            println!(
                "checkpoint does not perform restores directly. Backup artifacts for '{}' live under:",
                project.name
            );
            println!("  {}", project.backup_dir.display());
            println!("Restore the database dump(s) and file snapshot manually for your project's stack.");
        },
    )
    .map_err(|e| ExitError::new(1, e.to_string()))
}
