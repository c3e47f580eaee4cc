// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! checkpoint-db: the Database Pipeline (spec §4.6) — discovery, dump
//! mechanics, Docker lifecycle, and an opt-in credential store.

pub mod credentials;
pub mod descriptor;
pub mod discovery;
pub mod docker;
pub mod dump;
pub mod error;
pub mod pipeline;

pub use credentials::{CredentialStore, FileCredentialStore};
pub use descriptor::{is_local_host, DatabaseDescriptor, DockerDb, Engine, NetworkDb};
pub use discovery::{discover, parse_connection_url, sqlite_paths};
pub use docker::LifetimeFlag;
pub use dump::{dump, verify_and_cleanup_on_failure, DumpOutput};
pub use error::DbError;
pub use pipeline::{decide, skipped_outcome, Decision, DumpPolicy};

fn epoch_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// `YYYYMMDD_HHMMSS` formatted for artifact filenames (spec.md §6 "Backup
/// directory layout").
fn timestamp_now() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}
