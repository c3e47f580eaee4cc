// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use checkpoint_core::error::{Categorized, ErrorCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dump tool not found: {tool}")]
    ToolMissing { tool: &'static str },

    #[error("dump timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("dump process failed: {0}")]
    DumpFailed(String),

    #[error("database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("verification failed: artifact is empty or corrupt")]
    VerificationFailed,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("docker unavailable: {0}")]
    DockerUnavailable(String),
}

impl Categorized for DbError {
    fn category(&self) -> ErrorCategory {
        match self {
            DbError::Io(_) => ErrorCategory::Perm,
            DbError::ToolMissing { .. } => ErrorCategory::Capability,
            DbError::Timeout { .. } => ErrorCategory::Db,
            DbError::DumpFailed(_) => ErrorCategory::Db,
            DbError::ConnectionFailed(_) => ErrorCategory::Db,
            DbError::VerificationFailed => ErrorCategory::File,
            DbError::Sqlite(_) => ErrorCategory::Db,
            DbError::DockerUnavailable(_) => ErrorCategory::Capability,
        }
    }

    fn code(&self) -> u16 {
        match self {
            DbError::Io(_) => 1,
            DbError::ToolMissing { .. } => 2,
            DbError::Timeout { .. } => 3,
            DbError::DumpFailed(_) => 4,
            DbError::ConnectionFailed(_) => 5,
            DbError::VerificationFailed => 6,
            DbError::Sqlite(_) => 7,
            DbError::DockerUnavailable(_) => 8,
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            DbError::ToolMissing { tool } => Some(match *tool {
                "pg_dump" => "install postgresql-client",
                "mysqldump" => "install mysql-client",
                "mongodump" => "install mongodb-database-tools",
                "docker" => "install Docker or disable backup_docker_databases",
                _ => "install the missing dump tool",
            }),
            DbError::Timeout { .. } => Some("database may be under load — check connectivity"),
            DbError::DockerUnavailable(_) => Some("start the Docker daemon or disable backup_docker_databases"),
            _ => None,
        }
    }
}
