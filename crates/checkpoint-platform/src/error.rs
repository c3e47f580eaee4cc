// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Platform Facade error taxonomy (spec.md §4.1, §7).

use checkpoint_core::error::{Categorized, ErrorCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("service manager unavailable: {0}")]
    ServiceManagerUnavailable(String),

    #[error("agent install failed: {0}")]
    InstallFailed(String),

    #[error("agent not found: {project}")]
    AgentNotFound { project: String },

    #[error("lock contended: {name}")]
    LockContended { name: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Categorized for PlatformError {
    fn category(&self) -> ErrorCategory {
        match self {
            PlatformError::PermissionDenied(_) => ErrorCategory::Perm,
            PlatformError::ServiceManagerUnavailable(_) => ErrorCategory::Capability,
            PlatformError::InstallFailed(_) => ErrorCategory::Capability,
            PlatformError::AgentNotFound { .. } => ErrorCategory::Conf,
            PlatformError::LockContended { .. } => ErrorCategory::Unknown,
            PlatformError::Io(_) => ErrorCategory::Perm,
        }
    }

    fn code(&self) -> u16 {
        match self {
            PlatformError::PermissionDenied(_) => 1,
            PlatformError::ServiceManagerUnavailable(_) => 1,
            PlatformError::InstallFailed(_) => 2,
            PlatformError::AgentNotFound { .. } => 1,
            PlatformError::LockContended { .. } => 1,
            PlatformError::Io(_) => 2,
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            PlatformError::ServiceManagerUnavailable(_) => {
                Some("install launchd (macOS) or systemd (Linux) user services")
            }
            _ => None,
        }
    }
}
