// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for the `checkpoint` binary's integration specs: an
//! isolated state directory and a registered project to point the CLI at.

use std::path::PathBuf;

use assert_cmd::Command;
use checkpoint_core::{GlobalDefaults, Project, ProjectId};
use checkpoint_state::ProjectRegistry;

pub struct TestEnv {
    pub state_dir: tempfile::TempDir,
    pub project_root: tempfile::TempDir,
    pub project: Project,
}

impl TestEnv {
    /// A fresh state directory with one registered project whose root is an
    /// empty temp directory, and whose backup destination is a sibling temp
    /// directory (never the project root itself).
    pub fn new() -> Self {
        let state_dir = tempfile::tempdir().expect("state tempdir");
        let project_root = tempfile::tempdir().expect("project tempdir");
        let backup_dir = state_dir.path().join("backups");

        let project = Project {
            id: ProjectId::new(),
            name: "demo-project".to_string(),
            root: project_root.path().to_path_buf(),
            backup_dir,
            cloud_dir: None,
            remote_uri: None,
            drive_marker: None,
            encryption_key_file: None,
            enable_env_capture: true,
            enable_ide_capture: false,
            enable_notes_capture: false,
            enable_ai_artifact_capture: false,
            enable_db_backup: false,
            overrides: GlobalDefaults::default(),
        };

        let registry = ProjectRegistry::new(state_dir.path());
        registry.upsert(project.clone()).expect("register project");

        Self { state_dir, project_root, project }
    }

    /// A `checkpoint` invocation scoped to this environment's state
    /// directory, run from this environment's project root.
    pub fn checkpoint(&self) -> Command {
        let mut cmd = Command::cargo_bin("checkpoint").expect("checkpoint binary");
        cmd.current_dir(self.project_root.path());
        cmd.env("CHECKPOINT_STATE_DIR", self.state_dir.path());
        cmd
    }

    pub fn backup_databases_dir(&self) -> PathBuf {
        self.project.backup_dir.join("databases")
    }
}
