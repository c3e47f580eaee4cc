// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loads and merges a project's effective configuration (spec.md §3
//! "Global Defaults" precedence): environment overrides, then per-project
//! config, then global config, then schema built-ins. Global config lives
//! at `<state_root>/config.yaml`; a project's own override, if present, at
//! `<state_root>/projects/<id>/config.yaml`.

use checkpoint_core::ProjectId;
use checkpoint_state::{Config, StateRoot};

use crate::error::SchedulerError;

fn load_optional(path: &std::path::Path) -> Result<Config, SchedulerError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Config::load_str(&text)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Config::new()),
        Err(err) => Err(SchedulerError::Io(err)),
    }
}

pub fn effective_config(state_root: &StateRoot, project: &ProjectId) -> Result<Config, SchedulerError> {
    let global = load_optional(&state_root.path().join("config.yaml"))?;
    let project_cfg = load_optional(&state_root.project_dir(project).join("config.yaml"))?;
    let mut merged = Config::defaults().merged_with(&global).merged_with(&project_cfg);
    merged.apply_env_overrides();
    Ok(merged)
}

#[cfg(test)]
#[path = "config_load_tests.rs"]
mod tests;
