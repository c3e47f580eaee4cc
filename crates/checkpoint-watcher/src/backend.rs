// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `WatcherBackend`: the trait every concrete watcher implements, plus the
//! probe-then-fall-back selection logic from spec.md §4.3 ("Backend
//! selection... probe for native notification capabilities in this
//! preference order on each platform, then fall back to polling").

use std::path::PathBuf;

use async_trait::async_trait;
use checkpoint_core::{ChangeEvent, WatcherBackendKind};
use tokio::sync::mpsc;

use crate::error::WatcherError;
use crate::exclude::ExclusionSet;

/// A running watcher subscription. Events are opaque markers (spec.md §3):
/// no path list, no ordering guarantee. Dropping the receiver stops the
/// backend's background task.
#[async_trait]
pub trait WatcherBackend: Send {
    /// The backend actually selected, a read-only attribute for logs/status.
    fn kind(&self) -> WatcherBackendKind;

    /// Starts watching `root` and returns a channel of events. The first
    /// event delivered is always the startup-race synthetic catch-up event
    /// (spec.md §4.3 "Startup race").
    async fn watch(
        self: Box<Self>,
        root: PathBuf,
        exclusions: ExclusionSet,
    ) -> Result<mpsc::Receiver<ChangeEvent>, WatcherError>;
}

/// Builds the preferred backend for the host OS, falling back to polling
/// when native watching isn't available (e.g. the `notify` crate failing to
/// initialize a platform backend). Checkpoint's `PollingWatcher` is kept as
/// an explicit, independently selectable backend rather than relying on
/// `notify`'s own internal poll fallback, so callers can see which one was
/// actually used.
pub fn preferred_kind() -> WatcherBackendKind {
    if cfg!(target_os = "macos") {
        WatcherBackendKind::NativeKqueueStyle
    } else if cfg!(target_os = "linux") {
        WatcherBackendKind::NativeInotifyStyle
    } else {
        WatcherBackendKind::Polling
    }
}
