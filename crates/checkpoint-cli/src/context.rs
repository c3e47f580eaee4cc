// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared state every command needs: where state lives, the registry of
//! projects, and which project (if any) the current working directory
//! belongs to.

use std::path::PathBuf;
use std::sync::Arc;

use checkpoint_core::Project;
use checkpoint_platform::{PlatformFacade, SystemPlatform};
use checkpoint_state::{ProjectRegistry, StateRoot};

pub struct Context {
    pub state_root: Arc<StateRoot>,
    pub registry: ProjectRegistry,
    pub platform: Arc<dyn PlatformFacade>,
}

impl Context {
    pub fn new(state_dir: Option<PathBuf>) -> Self {
        let state_root = Arc::new(StateRoot::new(resolve_state_dir(state_dir)));
        let registry = ProjectRegistry::new(state_root.path());
        Self { state_root, registry, platform: Arc::new(SystemPlatform) }
    }

    /// The registered project whose root is an ancestor of `cwd`, preferring
    /// the deepest (longest) match when projects are nested.
    pub fn current_project(&self, cwd: &std::path::Path) -> anyhow::Result<Option<Project>> {
        let projects = self.registry.list()?;
        Ok(projects
            .into_iter()
            .filter(|p| cwd.starts_with(&p.root))
            .max_by_key(|p| p.root.as_os_str().len()))
    }
}

fn resolve_state_dir(override_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir;
    }
    if let Ok(dir) = std::env::var("CHECKPOINT_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(dir) = dirs::state_dir() {
        return dir.join("checkpoint");
    }
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".local/state/checkpoint")
}
