// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single cancellable "quiet timer" (spec.md §4.4 Trailing-edge debounce).
//!
//! On each event, any pending timer is cancelled and a new one started.
//! Modeled as a generation counter rather than an actual task-kill: each
//! `reset()` bumps the generation, and the previously spawned sleep simply
//! notices on wake that it is stale and exits quietly. This avoids the
//! "kill-the-sleeper child" pattern spec.md §9 calls out as something to
//! avoid.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

/// Handle for resetting the quiet timer. Cloned into the event-forwarding
/// loop; firing is reported on `fired_rx`.
#[derive(Clone)]
pub struct QuietTimer {
    generation: Arc<AtomicU64>,
    fired_tx: mpsc::Sender<()>,
}

impl QuietTimer {
    /// Spawns the timer machinery, returning the handle and the channel its
    /// expirations are reported on.
    pub fn new(debounce: Duration) -> (Self, mpsc::Receiver<()>) {
        let (fired_tx, fired_rx) = mpsc::channel(8);
        let timer = Self { generation: Arc::new(AtomicU64::new(0)), fired_tx };
        let _ = debounce;
        (timer, fired_rx)
    }

    /// Cancels any pending timer and starts a new one for `debounce`. The
    /// spawned task checks its captured generation against the live one
    /// when it wakes; a mismatch means a later `reset()` superseded it, so
    /// it exits without firing.
    pub fn reset(&self, debounce: Duration) {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = self.generation.clone();
        let fired_tx = self.fired_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if generation.load(Ordering::SeqCst) == my_generation {
                let _ = fired_tx.send(()).await;
            }
        });
    }

    /// Cancels any pending timer without starting a new one (shutdown path).
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
