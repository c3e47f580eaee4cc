// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! checkpoint-platform: the Platform Facade (spec §4.1) — the seam between
//! Checkpoint's core logic and OS-specific service managers, file stats,
//! desktop notifications, and advisory locking.

pub mod daemon_manager;
pub mod error;
pub mod lock;
pub mod notify_adapter;
pub mod platform;

pub use daemon_manager::{AgentStatus, DaemonManager, LaunchdManager, NullDaemonManager, SystemdManager};
pub use error::PlatformError;
pub use lock::{acquire as acquire_lock, LockGuard};
pub use notify_adapter::{DesktopNotifyAdapter, NotifyAdapter, NotifyError};
pub use platform::{FileStat, PlatformFacade, SystemPlatform};

#[cfg(any(test, feature = "test-support"))]
pub use notify_adapter::{FakeNotifyAdapter, NotifyCall};

#[cfg(any(test, feature = "test-support"))]
pub use platform::fake::FakePlatform;

#[cfg(any(test, feature = "test-support"))]
pub use daemon_manager::FakeDaemonManager;

/// Selects the `DaemonManager` appropriate for the host OS. Returns
/// `NullDaemonManager` on platforms Checkpoint doesn't otherwise support,
/// matching spec.md's "no service manager on this platform" capability
/// error rather than panicking at startup.
pub fn default_daemon_manager(agents_dir: std::path::PathBuf) -> Box<dyn DaemonManager> {
    #[cfg(target_os = "macos")]
    {
        Box::new(LaunchdManager::new(agents_dir))
    }
    #[cfg(target_os = "linux")]
    {
        Box::new(SystemdManager::new(agents_dir))
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        let _ = agents_dir;
        Box::new(NullDaemonManager)
    }
}
