// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An optional, opt-in credential lookup keyed by `(engine, database)`
//! (spec.md §3 Supplement "Credential store"). Isolated from discovery;
//! never cached beyond the current dump invocation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::descriptor::Engine;
use crate::error::DbError;

pub trait CredentialStore: Send + Sync {
    fn lookup(&self, engine: Engine, database: &str) -> Option<String>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(flatten)]
    entries: HashMap<String, String>,
}

fn key_for(engine: Engine, database: &str) -> String {
    format!("{engine}:{database}")
}

/// Reads `<state_root>/credentials.json` on every lookup — deliberately not
/// cached in memory so a credential's lifetime never exceeds the dump call
/// that needed it.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(state_root: &Path) -> Self {
        Self { path: state_root.join("credentials.json") }
    }

    /// Writes (or rewrites) the file with 0600 permissions on unix.
    pub fn set(&self, engine: Engine, database: &str, password: &str) -> Result<(), DbError> {
        let mut file = self.read_all();
        file.entries.insert(key_for(engine, database), password.to_string());
        let serialized = serde_json::to_string_pretty(&file).map_err(|e| DbError::DumpFailed(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, &self.path)?;
        set_owner_only_permissions(&self.path)?;
        Ok(())
    }

    fn read_all(&self) -> CredentialFile {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }
}

impl CredentialStore for FileCredentialStore {
    fn lookup(&self, engine: Engine, database: &str) -> Option<String> {
        self.read_all().entries.get(&key_for(engine, database)).cloned()
    }
}

#[cfg(unix)]
fn set_owner_only_permissions(path: &Path) -> Result<(), DbError> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o600);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_owner_only_permissions(_path: &Path) -> Result<(), DbError> {
    Ok(())
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
