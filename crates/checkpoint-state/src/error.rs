// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use checkpoint_core::error::{Categorized, ErrorCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown config key: {0}")]
    UnknownKey(String),

    #[error("wrong type for key {key}: expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Categorized for StateError {
    fn category(&self) -> ErrorCategory {
        match self {
            StateError::Io(_) => ErrorCategory::Perm,
            StateError::InvalidConfig(_) => ErrorCategory::Conf,
            StateError::UnknownKey(_) => ErrorCategory::Conf,
            StateError::TypeMismatch { .. } => ErrorCategory::Conf,
            StateError::Yaml(_) => ErrorCategory::Conf,
            StateError::Json(_) => ErrorCategory::Conf,
        }
    }

    fn code(&self) -> u16 {
        match self {
            StateError::Io(_) => 1,
            StateError::InvalidConfig(_) => 1,
            StateError::UnknownKey(_) => 2,
            StateError::TypeMismatch { .. } => 3,
            StateError::Yaml(_) => 4,
            StateError::Json(_) => 4,
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            StateError::UnknownKey(_) => Some("check `checkpoint config validate` for the recognized key list"),
            _ => None,
        }
    }
}
