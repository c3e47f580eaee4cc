// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Verification (spec.md §4.5 step 10): every compressed artifact is
//! decompress-tested and must be non-empty before it counts as successful.
//! A failing artifact is deleted and its slice marked failed rather than
//! aborting the whole run.

use std::path::PathBuf;

use crate::compression::CompressedArtifact;

#[derive(Debug, Clone, Default)]
pub struct VerificationOutcome {
    pub verified: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

pub fn verify_all(artifacts: &[CompressedArtifact]) -> VerificationOutcome {
    let mut outcome = VerificationOutcome::default();
    for artifact in artifacts {
        if !artifact.compressed {
            // Uncompressed artifacts were skipped for being too small to
            // benefit from gzip framing; nothing to decompress-test.
            outcome.verified.push(artifact.path.clone());
            continue;
        }
        match checkpoint_db::verify_and_cleanup_on_failure(&artifact.path) {
            Ok(()) => outcome.verified.push(artifact.path.clone()),
            Err(_) => outcome.failed.push(artifact.path.clone()),
        }
    }
    outcome
}

#[cfg(test)]
#[path = "verify_tests.rs"]
mod tests;
