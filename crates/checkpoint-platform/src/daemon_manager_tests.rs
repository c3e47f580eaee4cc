// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{AgentStatus, DaemonManager, NullDaemonManager};
use checkpoint_core::ProjectId;

#[tokio::test]
async fn null_manager_reports_unknown_status() {
    let manager = NullDaemonManager;
    let project = ProjectId::new();
    assert_eq!(manager.status_agent(&project).await, AgentStatus::Unknown);
}

#[tokio::test]
async fn null_manager_rejects_install_and_start() {
    let manager = NullDaemonManager;
    let project = ProjectId::new();
    assert!(manager.install_agent(&project, "true", &[], 60).await.is_err());
    assert!(manager.start_agent(&project).await.is_err());
}

#[tokio::test]
async fn null_manager_allows_remove_and_stop_as_no_ops() {
    let manager = NullDaemonManager;
    let project = ProjectId::new();
    assert!(manager.remove_agent(&project).await.is_ok());
    assert!(manager.stop_agent(&project).await.is_ok());
}
