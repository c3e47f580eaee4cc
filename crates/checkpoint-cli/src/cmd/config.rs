// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint config {get|set|validate|migrate}` — read and write the
//! dotted-key configuration (spec.md §6, §4.2).

use clap::{Args, Subcommand};

use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print a single key's effective value.
    Get {
        #[arg(long)]
        key: String,
    },
    /// Write a single key's value to the project (or global) config file.
    Set {
        #[arg(long)]
        key: String,
        #[arg(long)]
        value: String,
    },
    /// Check every key in the config file against the schema.
    Validate {
        /// Treat unrecognized keys as an error rather than a warning.
        #[arg(long)]
        strict: bool,
    },
    /// Rewrite the config file to the canonical YAML shape, preserving
    /// every recognized key's value.
    Migrate,
}

pub async fn run(args: ConfigArgs, ctx: &Context, format: OutputFormat) -> Result<(), ExitError> {
    match args.command {
        ConfigCommand::Get { key } => get(ctx, &key, format).await,
        ConfigCommand::Set { key, value } => set(ctx, &key, &value, format).await,
        ConfigCommand::Validate { strict } => validate(ctx, strict, format).await,
        ConfigCommand::Migrate => migrate(ctx, format).await,
    }
}

/// The config file this invocation targets: the current project's override
/// if the cwd resolves to one, otherwise the global config.
fn target_path(ctx: &Context) -> std::path::PathBuf {
    let cwd = std::env::current_dir().unwrap_or_default();
    match ctx.current_project(&cwd) {
        Ok(Some(project)) => ctx.state_root.project_dir(&project.id).join("config.yaml"),
        _ => ctx.state_root.path().join("config.yaml"),
    }
}

fn load(path: &std::path::Path) -> Result<checkpoint_state::Config, ExitError> {
    match std::fs::read_to_string(path) {
        Ok(text) => checkpoint_state::Config::load_str(&text).map_err(|e| ExitError::new(2, e.to_string())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(checkpoint_state::Config::new()),
        Err(err) => Err(ExitError::new(2, err.to_string())),
    }
}

async fn get(ctx: &Context, key: &str, format: OutputFormat) -> Result<(), ExitError> {
    let path = target_path(ctx);
    let cfg = load(&path)?;
    let effective = checkpoint_state::Config::defaults().merged_with(&cfg);
    let value = effective.get_raw(key).map(str::to_string);

    crate::output::format_or_json(
        format,
        &serde_json::json!({"key": key, "value": value}),
        || match &value {
            Some(v) => println!("{v}"),
            None => println!("(unset)"),
        },
    )
    .map_err(|e| ExitError::new(1, e.to_string()))?;

    if value.is_none() && checkpoint_state::schema::lookup(key).is_none() {
        return Err(ExitError::new(2, format!("unrecognized config key '{key}'")));
    }
    Ok(())
}

async fn set(ctx: &Context, key: &str, value: &str, format: OutputFormat) -> Result<(), ExitError> {
    let path = target_path(ctx);
    let mut cfg = load(&path)?;
    let previous = cfg.set(key, value).map_err(|e| ExitError::new(2, e.to_string()))?;
    cfg.write_atomic(&path).map_err(|e| ExitError::new(2, e.to_string()))?;

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let _ = checkpoint_state::audit::append(
        &ctx.state_root.audit_log_path(),
        &checkpoint_state::audit::AuditEntry {
            epoch_secs: now,
            key: key.to_string(),
            old: previous,
            new: value.to_string(),
        },
    );

    crate::output::format_or_json(
        format,
        &serde_json::json!({"key": key, "value": value}),
        || println!("set {key} = {value}"),
    )
    .map_err(|e| ExitError::new(1, e.to_string()))
}

async fn validate(ctx: &Context, strict: bool, format: OutputFormat) -> Result<(), ExitError> {
    let path = target_path(ctx);
    let cfg = load(&path)?;

    let unknown: Vec<&str> = cfg.iter().map(|(k, _)| k).filter(|k| checkpoint_state::schema::lookup(k).is_none()).collect();
    let ok = unknown.is_empty() || !strict;

    crate::output::format_or_json(
        format,
        &serde_json::json!({"path": path, "unknown_keys": unknown, "valid": ok}),
        || {
            if unknown.is_empty() {
                println!("{}: all keys recognized", path.display());
            } else {
                for key in &unknown {
                    println!("unrecognized key: {key}");
                }
            }
        },
    )
    .map_err(|e| ExitError::new(1, e.to_string()))?;

    if !ok {
        return Err(ExitError::new(2, format!("{} unrecognized key(s) under --strict", unknown.len())));
    }
    Ok(())
}

async fn migrate(ctx: &Context, format: OutputFormat) -> Result<(), ExitError> {
    let path = target_path(ctx);
    let cfg = load(&path)?;
    cfg.write_atomic(&path).map_err(|e| ExitError::new(2, e.to_string()))?;

    crate::output::format_or_json(
        format,
        &serde_json::json!({"path": path, "migrated": true}),
        || println!("rewrote {} in canonical form", path.display()),
    )
    .map_err(|e| ExitError::new(1, e.to_string()))
}
