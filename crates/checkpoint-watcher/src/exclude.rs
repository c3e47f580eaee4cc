// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusion patterns (spec.md §4.3): "≈27 common patterns" covering
//! dependency stores, build outputs, the project's own backup directory,
//! version-control internals, IDE caches, and compiled artifacts. User
//! additions are merged, never replace the defaults.

use regex::{escape, Regex, RegexSet};

use crate::error::WatcherError;

/// Directory/file name fragments excluded from watching and from the
/// polling-backend walk. Matched against any path component, not just the
/// leaf name, so `node_modules` excludes `foo/node_modules/bar` too.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    // dependency stores
    "node_modules",
    "vendor",
    "bower_components",
    ".venv",
    "venv",
    "site-packages",
    "__pycache__",
    "target",
    "Pods",
    ".bundle",
    // build outputs
    "dist",
    "build",
    ".next",
    ".nuxt",
    "out",
    "coverage",
    // version control internals
    ".git",
    ".hg",
    ".svn",
    // IDE / editor caches
    ".idea",
    ".vscode",
    ".vs",
    // compiled artifacts
    "*.pyc",
    "*.class",
    "*.o",
    // backup directory and OS noise
    ".checkpoint-backups",
    ".DS_Store",
];

#[derive(Debug, Clone)]
pub struct ExclusionSet {
    patterns: Vec<String>,
}

impl ExclusionSet {
    /// Merges `DEFAULT_EXCLUSIONS` with user-provided additions, plus the
    /// project's own backup directory name (always excluded so a backup run
    /// never re-triggers itself).
    pub fn new(user_patterns: &[String], backup_dir_name: Option<&str>) -> Self {
        let mut patterns: Vec<String> =
            DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect();
        patterns.extend(user_patterns.iter().cloned());
        if let Some(name) = backup_dir_name {
            patterns.push(name.to_string());
        }
        patterns.sort();
        patterns.dedup();
        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// True if any path component matches a literal pattern, or the leaf
    /// matches a `*.ext` glob pattern. Used by the polling backend and the
    /// macOS-style native backend's per-pattern application.
    pub fn is_excluded(&self, path: &std::path::Path) -> bool {
        let components: Vec<&str> =
            path.components().filter_map(|c| c.as_os_str().to_str()).collect();
        for pattern in &self.patterns {
            if let Some(ext) = pattern.strip_prefix("*.") {
                if components.last().map(|leaf| leaf.ends_with(&format!(".{ext}"))).unwrap_or(false) {
                    return true;
                }
            } else if components.iter().any(|c| *c == pattern) {
                return true;
            }
        }
        false
    }

    /// Folds every exclusion into one combined alternation regex, the shape
    /// the Linux-style native backend needs per spec.md §4.3 ("All excludes
    /// are folded into one combined alternation regex").
    pub fn combined_regex(&self) -> Result<Regex, WatcherError> {
        let alternatives: Vec<String> = self
            .patterns
            .iter()
            .map(|p| match p.strip_prefix("*.") {
                Some(ext) => format!(r"\.{}$", escape(ext)),
                None => format!(r"(^|/){}(/|$)", escape(p)),
            })
            .collect();
        let combined = alternatives.join("|");
        Regex::new(&combined).map_err(|source| WatcherError::InvalidPattern { pattern: combined, source })
    }

    /// A `RegexSet` variant of the same alternation, useful when callers
    /// need to know *which* pattern matched rather than just whether one did.
    pub fn regex_set(&self) -> Result<RegexSet, WatcherError> {
        let alternatives: Vec<String> = self
            .patterns
            .iter()
            .map(|p| match p.strip_prefix("*.") {
                Some(ext) => format!(r"\.{}$", escape(ext)),
                None => format!(r"(^|/){}(/|$)", escape(p)),
            })
            .collect();
        RegexSet::new(&alternatives)
            .map_err(|source| WatcherError::InvalidPattern { pattern: alternatives.join("|"), source })
    }
}

#[cfg(test)]
#[path = "exclude_tests.rs"]
mod tests;
