// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config audit trail: every config write appends one newline-delimited
//! JSON line to `<state_root>/config-audit.log` recording
//! `{timestamp, key, old, new}`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StateError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEntry {
    pub epoch_secs: u64,
    pub key: String,
    pub old: Option<String>,
    pub new: String,
}

/// Appends one audit line. The log is append-only; rotation is handled by
/// the same size-bounded rule applied to the backup log (spec.md §5
/// "Rotation").
pub fn append(path: &Path, entry: &AuditEntry) -> Result<(), StateError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let line = serde_json::to_string(entry)?;
    writeln!(file, "{line}")?;
    Ok(())
}

/// Reads back every entry, oldest first. Tolerant of a missing file.
pub fn read_all(path: &Path) -> Result<Vec<AuditEntry>, StateError> {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return Ok(Vec::new());
    };
    contents
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).map_err(StateError::from))
        .collect()
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
