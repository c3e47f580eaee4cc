// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! checkpoint-watcher: the Watcher Engine (spec §4.3) — a cross-platform
//! filesystem watcher with native backends and a polling fallback, emitting
//! opaque Change Events with no debouncing of its own.

pub mod backend;
pub mod error;
pub mod exclude;
pub mod native;
pub mod polling;

pub use backend::{preferred_kind, WatcherBackend};
pub use error::WatcherError;
pub use exclude::{ExclusionSet, DEFAULT_EXCLUSIONS};
pub use native::NativeWatcher;
pub use polling::PollingWatcher;

use checkpoint_core::WatcherBackendKind;

/// Constructs the backend for `kind`, matching the preference order spec.md
/// §4.3 describes (native first, falling back to polling).
pub fn build_backend(kind: WatcherBackendKind, poll_interval: std::time::Duration) -> Box<dyn WatcherBackend> {
    match kind {
        WatcherBackendKind::Polling => Box::new(PollingWatcher::new(poll_interval)),
        other => Box::new(NativeWatcher::new(other)),
    }
}
