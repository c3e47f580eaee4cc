// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use checkpoint_core::error::{Categorized, ErrorCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebounceError {
    #[error("watcher subscription lost: {0}")]
    SubscriptionLost(String),

    #[error("state error: {0}")]
    State(#[from] checkpoint_state::StateError),

    #[error("platform error: {0}")]
    Platform(#[from] checkpoint_platform::PlatformError),
}

impl Categorized for DebounceError {
    fn category(&self) -> ErrorCategory {
        match self {
            DebounceError::SubscriptionLost(_) => ErrorCategory::Capability,
            DebounceError::State(e) => e.category(),
            DebounceError::Platform(e) => e.category(),
        }
    }

    fn code(&self) -> u16 {
        match self {
            DebounceError::SubscriptionLost(_) => 1,
            DebounceError::State(e) => e.code(),
            DebounceError::Platform(e) => e.code(),
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            DebounceError::SubscriptionLost(_) => {
                Some("watcher will be restarted by the supervisor")
            }
            DebounceError::State(e) => e.suggestion(),
            DebounceError::Platform(e) => e.suggestion(),
        }
    }
}
