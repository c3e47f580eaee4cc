// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use checkpoint_core::error::{Categorized, ErrorCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("backup lock contended")]
    LockContended,

    #[error("paused")]
    Paused,

    #[error("drive marker missing")]
    DriveMarkerMissing,

    #[error("disk usage at or above critical threshold ({pct}%)")]
    DiskCritical { pct: u8 },

    #[error("state error: {0}")]
    State(#[from] checkpoint_state::StateError),

    #[error("platform error: {0}")]
    Platform(#[from] checkpoint_platform::PlatformError),

    #[error("database pipeline error: {0}")]
    Db(#[from] checkpoint_db::DbError),

    #[error("encryption error: {0}")]
    Encryption(String),
}

impl Categorized for ExecutorError {
    fn category(&self) -> ErrorCategory {
        match self {
            ExecutorError::Io(_) => ErrorCategory::File,
            ExecutorError::LockContended => ErrorCategory::Conf,
            ExecutorError::Paused => ErrorCategory::Conf,
            ExecutorError::DriveMarkerMissing => ErrorCategory::Disk,
            ExecutorError::DiskCritical { .. } => ErrorCategory::Disk,
            ExecutorError::State(e) => e.category(),
            ExecutorError::Platform(e) => e.category(),
            ExecutorError::Db(e) => e.category(),
            ExecutorError::Encryption(_) => ErrorCategory::Conf,
        }
    }

    fn code(&self) -> u16 {
        match self {
            ExecutorError::Io(_) => 1,
            ExecutorError::LockContended => 5,
            ExecutorError::Paused => 1,
            ExecutorError::DriveMarkerMissing => 2,
            ExecutorError::DiskCritical { .. } => 3,
            ExecutorError::State(e) => e.code(),
            ExecutorError::Platform(e) => e.code(),
            ExecutorError::Db(e) => e.code(),
            ExecutorError::Encryption(_) => 9,
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            ExecutorError::DiskCritical { .. } => {
                Some("free space or increase quota -- df -h $BACKUP_DIR")
            }
            ExecutorError::DriveMarkerMissing => {
                Some("mount the backup drive or disable drive_verification_enabled")
            }
            ExecutorError::LockContended => Some("another backup is already running for this project"),
            _ => None,
        }
    }
}
