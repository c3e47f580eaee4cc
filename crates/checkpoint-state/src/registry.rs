// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The set of registered projects (spec.md §3's "registered project" —
//! something has to hold the list the Scheduler spawns a Watcher and
//! Periodic Agent for). Persisted as one JSON document at
//! `<state_root>/projects.json`, written with the same temp-then-rename
//! idiom as every other state file in this crate.

use std::path::{Path, PathBuf};

use checkpoint_core::{Project, ProjectId};
use serde::{Deserialize, Serialize};

use crate::error::StateError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegistryDoc {
    projects: Vec<Project>,
}

/// Handle to the registered-project list for one `state_root`.
#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    path: PathBuf,
}

impl ProjectRegistry {
    pub fn new(state_root: &Path) -> Self {
        Self { path: state_root.join("projects.json") }
    }

    fn load(&self) -> Result<RegistryDoc, StateError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(RegistryDoc::default()),
            Err(err) => Err(StateError::Io(err)),
        }
    }

    fn save(&self, doc: &RegistryDoc) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(doc)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Project>, StateError> {
        Ok(self.load()?.projects)
    }

    pub fn get(&self, id: &ProjectId) -> Result<Option<Project>, StateError> {
        Ok(self.load()?.projects.into_iter().find(|p| &p.id == id))
    }

    /// Inserts `project`, replacing any existing entry with the same id.
    pub fn upsert(&self, project: Project) -> Result<(), StateError> {
        let mut doc = self.load()?;
        doc.projects.retain(|p| p.id != project.id);
        doc.projects.push(project);
        self.save(&doc)
    }

    pub fn remove(&self, id: &ProjectId) -> Result<(), StateError> {
        let mut doc = self.load()?;
        doc.projects.retain(|p| &p.id != id);
        self.save(&doc)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
