// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polling backend: iterate `find-newer-than-marker` every `poll_interval`
//! (default 30s), updating the marker when changes are found. Applies
//! excludes at walk time (spec.md §4.3).

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use checkpoint_core::{ChangeEvent, WatcherBackendKind};
use tokio::sync::mpsc;
use walkdir::WalkDir;

use crate::backend::WatcherBackend;
use crate::error::WatcherError;
use crate::exclude::ExclusionSet;

pub struct PollingWatcher {
    poll_interval: Duration,
}

impl PollingWatcher {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

fn newest_mtime_since(root: &std::path::Path, exclusions: &ExclusionSet, marker: SystemTime) -> bool {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !exclusions.is_excluded(entry.path()))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok()?.modified().ok())
        .any(|modified| modified > marker)
}

#[async_trait]
impl WatcherBackend for PollingWatcher {
    fn kind(&self) -> WatcherBackendKind {
        WatcherBackendKind::Polling
    }

    async fn watch(
        self: Box<Self>,
        root: PathBuf,
        exclusions: ExclusionSet,
    ) -> Result<mpsc::Receiver<ChangeEvent>, WatcherError> {
        if !root.exists() {
            return Err(WatcherError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("watch root does not exist: {}", root.display()),
            )));
        }

        let (tx, rx) = mpsc::channel(16);
        let poll_interval = self.poll_interval;

        tokio::spawn(async move {
            let _ = tx.send(ChangeEvent::catchup()).await;
            let mut marker = SystemTime::now();
            loop {
                tokio::time::sleep(poll_interval).await;
                if newest_mtime_since(&root, &exclusions, marker) {
                    marker = SystemTime::now();
                    if tx.send(ChangeEvent::observed()).await.is_err() {
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }
}

#[cfg(test)]
#[path = "polling_tests.rs"]
mod tests;
