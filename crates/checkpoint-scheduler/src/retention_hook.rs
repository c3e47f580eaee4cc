// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The real [`RetentionHook`](checkpoint_executor::RetentionHook)
//! implementation: resolves a project id to its backup directory and
//! effective config, then runs the retention sweep (spec.md §4.7,
//! "Runs at the end of every successful Executor pass").

use async_trait::async_trait;
use checkpoint_core::ProjectId;
use checkpoint_executor::{ExecutorError, RetentionHook};
use checkpoint_state::{ProjectRegistry, StateRoot};

use crate::config_load::effective_config;
use crate::retention::{sweep_backup_dir, RetentionPolicy};

pub struct ProjectRetentionHook {
    state_root: StateRoot,
    registry: ProjectRegistry,
}

impl ProjectRetentionHook {
    pub fn new(state_root: StateRoot) -> Self {
        let registry = ProjectRegistry::new(state_root.path());
        Self { state_root, registry }
    }
}

#[async_trait]
impl RetentionHook for ProjectRetentionHook {
    async fn run_retention(&self, project: &ProjectId) -> Result<(), ExecutorError> {
        let Some(found) = self.registry.get(project)? else {
            return Err(ExecutorError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no registered project {project}"),
            )));
        };

        let cfg = effective_config(&self.state_root, project)
            .map_err(|e| ExecutorError::Io(std::io::Error::other(e.to_string())))?;
        let policy = RetentionPolicy::from_config(&cfg);
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let report = sweep_backup_dir(&found.backup_dir, &policy, now)
            .map_err(|e| ExecutorError::Io(std::io::Error::other(e.to_string())))?;
        tracing::info!(
            project_id = %project,
            databases_deleted = report.databases_deleted.len(),
            files_deleted = report.files_deleted.len(),
            "retention sweep complete"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "retention_hook_tests.rs"]
mod tests;
