// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use checkpoint_core::error::{Categorized, ErrorCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state error: {0}")]
    State(#[from] checkpoint_state::StateError),

    #[error("platform error: {0}")]
    Platform(#[from] checkpoint_platform::PlatformError),

    #[error("unknown project: {0}")]
    UnknownProject(String),
}

impl Categorized for SchedulerError {
    fn category(&self) -> ErrorCategory {
        match self {
            SchedulerError::Io(_) => ErrorCategory::File,
            SchedulerError::State(e) => e.category(),
            SchedulerError::Platform(e) => e.category(),
            SchedulerError::UnknownProject(_) => ErrorCategory::Conf,
        }
    }

    fn code(&self) -> u16 {
        match self {
            SchedulerError::Io(_) => 1,
            SchedulerError::State(e) => e.code(),
            SchedulerError::Platform(e) => e.code(),
            SchedulerError::UnknownProject(_) => 1,
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            SchedulerError::UnknownProject(_) => Some("check `checkpoint status` for registered project ids"),
            _ => None,
        }
    }
}
