// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Native watcher backend wrapping the `notify` crate, which itself
//! multiplexes to FSEvents, inotify, and a poll fallback per OS.
//! Checkpoint folds `notify`'s per-file-close/create/delete/move events
//! (never modify-per-write, which fires per-syscall) into opaque Change
//! Events; exclusions are applied before any event reaches the channel.

use std::path::PathBuf;

use async_trait::async_trait;
use checkpoint_core::{ChangeEvent, WatcherBackendKind};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::backend::WatcherBackend;
use crate::error::WatcherError;
use crate::exclude::ExclusionSet;

pub struct NativeWatcher {
    kind: WatcherBackendKind,
}

impl NativeWatcher {
    pub fn new(kind: WatcherBackendKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl WatcherBackend for NativeWatcher {
    fn kind(&self) -> WatcherBackendKind {
        self.kind
    }

    async fn watch(
        self: Box<Self>,
        root: PathBuf,
        exclusions: ExclusionSet,
    ) -> Result<mpsc::Receiver<ChangeEvent>, WatcherError> {
        let (out_tx, out_rx) = mpsc::channel(256);
        let (raw_tx, mut raw_rx) = mpsc::unbounded_channel();

        let mut watcher: RecommendedWatcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                if let Ok(event) = res {
                    if is_relevant(&event.kind) {
                        let _ = raw_tx.send(event.paths);
                    }
                }
            })
            .map_err(|e| WatcherError::SubscriptionLost(e.to_string()))?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| WatcherError::SubscriptionLost(e.to_string()))?;

        // Startup race (spec.md §4.3): subscription setup can take tens of
        // seconds on large trees, during which events are lost. Emit an
        // immediate synthetic catch-up event now that the subscription
        // above has been established.
        let _ = out_tx.try_send(ChangeEvent::catchup());

        tokio::spawn(async move {
            // Keep the watcher alive for the lifetime of the forwarding task.
            let _watcher = watcher;
            while let Some(paths) = raw_rx.recv().await {
                if paths.iter().any(|p| !exclusions.is_excluded(p)) {
                    if out_tx.send(ChangeEvent::observed()).await.is_err() {
                        break;
                    }
                }
            }
        });

        Ok(out_rx)
    }
}

fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(notify::event::ModifyKind::Name(_))
    ) || matches!(kind, EventKind::Access(notify::event::AccessKind::Close(notify::event::AccessMode::Write)))
}

#[cfg(test)]
#[path = "native_tests.rs"]
mod tests;
