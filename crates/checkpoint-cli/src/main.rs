// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `checkpoint` — the operator-facing CLI: force a backup, manage the
//! watcher and scheduled agent, inspect status, read and write config, and
//! run retention by hand (spec.md §6).

mod cmd;
mod color;
mod context;
mod exit_error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use context::Context;
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "checkpoint",
    version,
    about = "Per-developer, per-project automated backups",
    styles = color::styles()
)]
struct Cli {
    /// Output format for commands that support structured output.
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,
    /// Override the state directory (defaults to $CHECKPOINT_STATE_DIR or
    /// the platform state directory).
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Force one backup of the current project.
    Now(cmd::now::NowArgs),
    /// Manage the file-watcher process for the current project.
    Watch(cmd::watch::WatchArgs),
    /// Install or remove the periodic background agent.
    DaemonSchedule(cmd::daemon_schedule::DaemonScheduleArgs),
    /// Show a health overview across every registered project.
    Status(cmd::status::StatusArgs),
    /// Read or write dotted-key configuration.
    Config(cmd::config::ConfigArgs),
    /// Run the retention engine against the current project's backups.
    Cleanup(cmd::cleanup::CleanupArgs),
    /// Print where to find backup artifacts for a manual restore.
    Restore(cmd::restore::RestoreArgs),
    /// Decompress-test every archived database dump.
    Verify(cmd::verify::VerifyArgs),
}

async fn run(cli: Cli) -> Result<(), ExitError> {
    let ctx = Context::new(cli.state_dir);
    let format = cli.format;
    match cli.command {
        Commands::Now(args) => cmd::now::run(args, &ctx, format).await,
        Commands::Watch(args) => cmd::watch::run(args, &ctx, format).await,
        Commands::DaemonSchedule(args) => cmd::daemon_schedule::run(args, &ctx, format).await,
        Commands::Status(args) => cmd::status::run(args, &ctx, format).await,
        Commands::Config(args) => cmd::config::run(args, &ctx, format).await,
        Commands::Cleanup(args) => cmd::cleanup::run(args, &ctx, format).await,
        Commands::Restore(args) => cmd::restore::run(args, &ctx, format).await,
        Commands::Verify(args) => cmd::verify::run(args, &ctx, format).await,
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(std::io::stderr)).try_init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("{}", err.message);
            std::process::exit(err.code);
        }
    }
}
