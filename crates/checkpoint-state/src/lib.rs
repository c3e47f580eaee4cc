// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! checkpoint-state: the Config & State Store (spec §4.2) — schema-validated
//! configuration, state files, and the config audit trail. The only
//! component permitted to persist mutable state; every other component
//! reads and requests updates through it.

pub mod audit;
pub mod config;
pub mod error;
pub mod registry;
pub mod schema;
pub mod state_files;

pub use audit::AuditEntry;
pub use config::Config;
pub use error::StateError;
pub use registry::ProjectRegistry;
pub use schema::{KeySchema, ValueKind, SCHEMA};
pub use state_files::{ProjectState, StateRoot};
