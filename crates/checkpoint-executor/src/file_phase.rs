// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The file phase (spec.md §4.5 step 7): stage changed files into a
//! mirrored `files/` tree, archiving whatever they're about to replace into
//! `archived/YYYYMMDD_HHMMSS/` so a restore can recover any prior version.

use std::path::{Path, PathBuf};

use checkpoint_core::SymlinkPolicy;

use crate::error::ExecutorError;

#[derive(Debug, Clone, Default)]
pub struct FilePhaseOutcome {
    pub staged: Vec<PathBuf>,
    pub archived: Vec<PathBuf>,
    pub skipped_symlinks: Vec<PathBuf>,
}

/// Stages every path in `candidate_files` (absolute, under `project_root`)
/// into `<backup_dir>/files/<relative>`, archiving whatever that mirrored
/// path previously held into `<backup_dir>/archived/<stamp>/<relative>`.
pub fn stage(
    candidate_files: &[PathBuf],
    project_root: &Path,
    backup_dir: &Path,
    symlink_policy: SymlinkPolicy,
    stamp: &str,
) -> Result<FilePhaseOutcome, ExecutorError> {
    let files_root = backup_dir.join("files");
    let archive_root = backup_dir.join("archived").join(stamp);
    let mut outcome = FilePhaseOutcome::default();

    for source in candidate_files {
        let Ok(relative) = source.strip_prefix(project_root) else { continue };
        let dest = files_root.join(relative);

        let source_meta = std::fs::symlink_metadata(source)?;
        if source_meta.file_type().is_symlink() {
            match symlink_policy {
                SymlinkPolicy::Skip => {
                    outcome.skipped_symlinks.push(source.clone());
                    continue;
                }
                SymlinkPolicy::Preserve => {
                    archive_existing(&dest, &archive_root, relative, &mut outcome)?;
                    recreate_symlink(source, &dest)?;
                    outcome.staged.push(dest);
                    continue;
                }
                SymlinkPolicy::Follow => {
                    // fall through: copy the resolved target's content below
                }
            }
        }

        archive_existing(&dest, &archive_root, relative, &mut outcome)?;
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(source, &dest)?;
        copy_permissions(source, &dest)?;
        outcome.staged.push(dest);
    }

    Ok(outcome)
}

fn archive_existing(
    dest: &Path,
    archive_root: &Path,
    relative: &Path,
    outcome: &mut FilePhaseOutcome,
) -> Result<(), ExecutorError> {
    if !dest.exists() {
        return Ok(());
    }
    let archived_path = archive_root.join(relative);
    if let Some(parent) = archived_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::rename(dest, &archived_path)?;
    outcome.archived.push(archived_path);
    Ok(())
}

#[cfg(unix)]
fn recreate_symlink(source: &Path, dest: &Path) -> Result<(), ExecutorError> {
    let target = std::fs::read_link(source)?;
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if dest.exists() || std::fs::symlink_metadata(dest).is_ok() {
        std::fs::remove_file(dest)?;
    }
    std::os::unix::fs::symlink(target, dest)?;
    Ok(())
}

#[cfg(not(unix))]
fn recreate_symlink(source: &Path, dest: &Path) -> Result<(), ExecutorError> {
    // No portable symlink primitive outside unix; fall back to copying the
    // link's resolved contents rather than failing the whole phase.
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(source, dest)?;
    Ok(())
}

#[cfg(unix)]
fn copy_permissions(source: &Path, dest: &Path) -> Result<(), ExecutorError> {
    let perms = std::fs::metadata(source)?.permissions();
    std::fs::set_permissions(dest, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_permissions(_source: &Path, _dest: &Path) -> Result<(), ExecutorError> {
    Ok(())
}

#[cfg(test)]
#[path = "file_phase_tests.rs"]
mod tests;
