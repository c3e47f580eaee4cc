// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use checkpoint_core::error::{Categorized, ErrorCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatcherError {
    /// The subscription aborted (watch limit exceeded, subtree deleted).
    /// Recoverable: the supervisor restarts the Watcher (spec.md §4.3).
    #[error("subscription lost: {0}")]
    SubscriptionLost(String),

    /// Repeated `SubscriptionLost` escalates here.
    #[error("watcher capability unavailable: {0}")]
    CapabilityError(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid exclusion pattern {pattern:?}: {source}")]
    InvalidPattern { pattern: String, source: regex::Error },
}

impl Categorized for WatcherError {
    fn category(&self) -> ErrorCategory {
        match self {
            WatcherError::SubscriptionLost(_) => ErrorCategory::Unknown,
            WatcherError::CapabilityError(_) => ErrorCategory::Capability,
            WatcherError::Io(_) => ErrorCategory::Perm,
            WatcherError::InvalidPattern { .. } => ErrorCategory::Conf,
        }
    }

    fn code(&self) -> u16 {
        match self {
            WatcherError::SubscriptionLost(_) => 1,
            WatcherError::CapabilityError(_) => 1,
            WatcherError::Io(_) => 2,
            WatcherError::InvalidPattern { .. } => 1,
        }
    }
}
