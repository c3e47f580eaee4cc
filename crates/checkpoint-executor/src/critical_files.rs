// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Critical-file capture (spec.md §4.5 step 5): environment files,
//! credential material, and a handful of opt-in categories, captured
//! regardless of VCS state since these are typically gitignored. The list
//! is data-driven from config flags; missing targets are silently skipped.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

const MAX_SCAN_DEPTH: usize = 4;

/// Name fragments matched against the file's leaf name (prefix) or
/// extension (suffix, via `*.ext`).
const ENV_PATTERNS: &[&str] = &[".env", ".env.local", ".env.production", ".env.development", ".env.test"];

const CREDENTIAL_PATTERNS: &[&str] =
    &["id_rsa", "id_ed25519", "*.pem", "*.key", "*.p12", "*.pfx", ".npmrc", ".netrc", "credentials.json"];

const IDE_DIRS: &[&str] = &[".vscode", ".idea"];

const NOTES_PATTERNS: &[&str] = &["NOTES.md", "TODO.md", "notes.txt", ".notes"];

const AI_ARTIFACT_DIRS: &[&str] = &[".claude", ".cursor", ".aider", ".copilot"];

#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalFileFlags {
    pub env_capture: bool,
    pub ide_capture: bool,
    pub notes_capture: bool,
    pub ai_artifact_capture: bool,
}

/// Walks `project_root` up to a shallow depth and collects every path
/// matching an enabled category. Credential material is always captured;
/// everything else is gated by its own flag.
pub fn collect(project_root: &Path, flags: CriticalFileFlags) -> Vec<PathBuf> {
    let mut out = Vec::new();

    for entry in WalkDir::new(project_root).max_depth(MAX_SCAN_DEPTH).into_iter().flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if entry.file_type().is_file() {
            if matches_any(&name, CREDENTIAL_PATTERNS) {
                out.push(path.to_path_buf());
                continue;
            }
            if flags.env_capture && matches_any(&name, ENV_PATTERNS) {
                out.push(path.to_path_buf());
                continue;
            }
            if flags.notes_capture && matches_any(&name, NOTES_PATTERNS) {
                out.push(path.to_path_buf());
            }
        } else if entry.file_type().is_dir() {
            if flags.ide_capture && IDE_DIRS.contains(&name.as_str()) {
                out.push(path.to_path_buf());
            }
            if flags.ai_artifact_capture && AI_ARTIFACT_DIRS.contains(&name.as_str()) {
                out.push(path.to_path_buf());
            }
        }
    }

    out
}

fn matches_any(name: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|pattern| match pattern.strip_prefix("*.") {
        Some(ext) => name.ends_with(&format!(".{ext}")),
        None => name == *pattern,
    })
}

#[cfg(test)]
#[path = "critical_files_tests.rs"]
mod tests;
