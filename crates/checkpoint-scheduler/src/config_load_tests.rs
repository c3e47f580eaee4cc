// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use checkpoint_core::ProjectId;
use checkpoint_state::StateRoot;

use super::*;

#[test]
fn missing_config_files_yield_schema_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let state_root = StateRoot::new(dir.path());
    let cfg = effective_config(&state_root, &ProjectId::new()).unwrap();
    assert_eq!(cfg.get_int("retention.keep_minimum"), Some(3));
}

#[test]
fn project_override_wins_over_global() {
    let dir = tempfile::tempdir().unwrap();
    let state_root = StateRoot::new(dir.path());
    std::fs::write(dir.path().join("config.yaml"), "retention:\n  keep_minimum: 5\n").unwrap();

    let project = ProjectId::new();
    let project_dir = state_root.project_dir(&project);
    std::fs::create_dir_all(&project_dir).unwrap();
    std::fs::write(project_dir.join("config.yaml"), "retention:\n  keep_minimum: 9\n").unwrap();

    let cfg = effective_config(&state_root, &project).unwrap();
    assert_eq!(cfg.get_int("retention.keep_minimum"), Some(9));
}
