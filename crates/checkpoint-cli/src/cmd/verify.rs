// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint verify` — decompress-test every archived database dump under
//! the current project's backup directory (spec.md §6, §4.6's corruption
//! check applied on demand rather than only at dump time).

use clap::Args;
use serde::Serialize;

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct VerifyArgs {}

#[derive(Debug, Serialize)]
struct VerifyOutcome {
    path: std::path::PathBuf,
    ok: bool,
    error: Option<String>,
}

pub async fn run(_args: VerifyArgs, ctx: &Context, format: OutputFormat) -> Result<(), ExitError> {
    let cwd = std::env::current_dir().map_err(|e| ExitError::new(7, e.to_string()))?;
    let project = ctx
        .current_project(&cwd)
        .map_err(|e| ExitError::new(7, e.to_string()))?
        .ok_or_else(|| ExitError::new(7, "current directory is not a registered project"))?;

    let databases_dir = project.backup_dir.join("databases");
    let mut outcomes = Vec::new();
    for entry in walkdir::WalkDir::new(&databases_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "gz"))
    {
        let path = entry.path().to_path_buf();
        match checkpoint_db::verify_and_cleanup_on_failure(&path) {
            Ok(()) => outcomes.push(VerifyOutcome { path, ok: true, error: None }),
            Err(err) => outcomes.push(VerifyOutcome { path, ok: false, error: Some(err.to_string()) }),
        }
    }

    let any_failed = outcomes.iter().any(|o| !o.ok);

    crate::output::format_or_json(format, &outcomes, || {
        if outcomes.is_empty() {
            println!("no database artifacts to verify under {}", databases_dir.display());
            return;
        }
        for outcome in &outcomes {
            match &outcome.error {
                Some(err) => println!("FAIL {}: {err}", outcome.path.display()),
                None => println!("ok   {}", outcome.path.display()),
            }
        }
    })
    .map_err(|e| ExitError::new(1, e.to_string()))?;

    if any_failed {
        return Err(ExitError::new(7, "one or more backup artifacts failed verification"));
    }
    Ok(())
}
