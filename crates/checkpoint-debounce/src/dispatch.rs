// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The narrow seam the Debouncer calls into the Executor through. Defined
//! here (rather than depending on `checkpoint-executor` directly) so the
//! dependency graph stays acyclic: `checkpoint-executor` may one day want
//! debounce-aware helpers without creating a cycle.

use async_trait::async_trait;
use checkpoint_core::{BackupRecord, ProjectId, TriggerCause};

/// Implemented by whatever runs the actual Backup Executor pipeline.
#[async_trait]
pub trait ExecutorDispatch: Send + Sync {
    async fn run_backup(&self, project: ProjectId, cause: TriggerCause) -> BackupRecord;
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records every dispatch it receives instead of doing any real work.
    #[derive(Clone, Default)]
    pub struct FakeExecutor {
        calls: Arc<Mutex<Vec<(ProjectId, TriggerCause)>>>,
    }

    impl FakeExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<(ProjectId, TriggerCause)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl ExecutorDispatch for FakeExecutor {
        async fn run_backup(&self, project: ProjectId, cause: TriggerCause) -> BackupRecord {
            self.calls.lock().push((project.clone(), cause));
            BackupRecord {
                project_id: project,
                start_epoch_secs: 0,
                end_epoch_secs: 0,
                outcome: checkpoint_core::BackupOutcome::Success,
                db_outcomes: vec![],
                bytes_written: 0,
                cause,
                backup_dirs: vec![],
                extra: Default::default(),
            }
        }
    }
}
