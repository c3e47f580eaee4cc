// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A small wall-clock-timeout wrapper around `tokio::process::Command`,
//! shared by every step that shells out to an external binary (git status,
//! the remote-mirror copy command). Every external command in the Executor
//! runs under one of these named timeouts (spec.md §5 "Cancellation &
//! timeouts").

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::ExecutorError;

pub const GIT_STATUS_TIMEOUT: Duration = Duration::from_secs(30);
pub const REMOTE_MIRROR_TIMEOUT: Duration = Duration::from_secs(300);

pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    label: &str,
) -> Result<std::process::Output, ExecutorError> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let output = tokio::time::timeout(timeout, cmd.output()).await.map_err(|_| {
        ExecutorError::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("{label} timed out after {}s", timeout.as_secs()),
        ))
    })?;
    output.map_err(ExecutorError::Io)
}
