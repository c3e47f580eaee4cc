// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A narrow callback trait invoked at the end of a successful run (spec.md
//! §4.5 step 12, §4.7 "Retention engine... runs at the end of every
//! successful Executor pass"). Defined here rather than depended on from
//! `checkpoint-scheduler` so the two crates don't form a dependency cycle —
//! `checkpoint-scheduler` provides the real implementation; the daily sweep
//! binary calls the same retention engine directly.

use async_trait::async_trait;
use checkpoint_core::ProjectId;

use crate::error::ExecutorError;

#[async_trait]
pub trait RetentionHook: Send + Sync {
    async fn run_retention(&self, project: &ProjectId) -> Result<(), ExecutorError>;
}

/// No-op implementation for callers that don't want retention run inline
/// (e.g. tests, or a caller that schedules retention separately).
pub struct NullRetentionHook;

#[async_trait]
impl RetentionHook for NullRetentionHook {
    async fn run_retention(&self, _project: &ProjectId) -> Result<(), ExecutorError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "retention_hook_tests.rs"]
mod tests;
