// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dump-decision policy (spec.md §4.6 "Dump decision"): given a
//! Database Descriptor and the project's DB-related config flags, decides
//! whether and how to dump it. Kept free of the Executor's own step
//! numbering so it can be unit-tested without a full backup run.

use checkpoint_core::{BackupOutcome, DbSubOutcome};

use crate::descriptor::DatabaseDescriptor;

/// The subset of config this decision needs, passed explicitly rather than
/// through a `checkpoint-state` dependency — keeps this crate's dependency
/// surface narrow and the decision testable with plain structs.
#[derive(Debug, Clone, Copy)]
pub struct DumpPolicy {
    pub auto_start_local_db: bool,
    pub stop_db_after_backup: bool,
    pub backup_remote_databases: bool,
    pub backup_docker_databases: bool,
    pub auto_start_docker: bool,
}

/// What the pipeline should do for one descriptor, decided before any I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Dump,
    /// The descriptor names a local network DB that isn't running and
    /// `auto_start_local_db` is off — or a Docker DB with
    /// `backup_docker_databases` off. Not a failure (spec.md §4.6 "skipped"
    /// classification).
    Skip,
    /// Remote DB with `backup_remote_databases` disabled.
    Disabled,
}

pub fn decide(descriptor: &DatabaseDescriptor, policy: DumpPolicy) -> Decision {
    match descriptor {
        DatabaseDescriptor::Sqlite { .. } => Decision::Dump,
        DatabaseDescriptor::Network(net) => {
            if net.is_local {
                Decision::Dump
            } else if policy.backup_remote_databases {
                Decision::Dump
            } else {
                Decision::Disabled
            }
        }
        DatabaseDescriptor::Docker(_) => {
            if policy.backup_docker_databases {
                Decision::Dump
            } else {
                Decision::Disabled
            }
        }
    }
}

/// Converts a skip/disabled decision into the sub-outcome the Executor
/// records (spec.md §3 Backup Record "per-database sub-outcomes").
pub fn skipped_outcome(descriptor: &DatabaseDescriptor, detail: &str) -> DbSubOutcome {
    DbSubOutcome {
        descriptor_key: descriptor.dedup_key(),
        outcome: BackupOutcome::Skipped,
        bytes_written: 0,
        detail: Some(detail.to_string()),
    }
}
