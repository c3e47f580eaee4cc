// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `DaemonManager`: installs, removes, starts, stops, and reports the status
//! of the per-project periodic backup agent (spec.md §4.1, §4.7).
//!
//! On macOS this shells out to `launchctl` against a generated
//! `~/Library/LaunchAgents/<label>.plist`. On Linux it shells out to
//! `systemctl --user` against a generated unit under
//! `~/.config/systemd/user/<label>.service`. Both are real service
//! managers driven via their CLI, the same shelling-out pattern used
//! elsewhere in this workspace for external tools.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use checkpoint_core::ProjectId;

use crate::error::PlatformError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStatus {
    Running,
    Stopped,
    Unknown,
}

fn label_for(project: &ProjectId) -> String {
    format!("com.alfredjean.checkpoint.{project}")
}

#[async_trait]
pub trait DaemonManager: Send + Sync + 'static {
    async fn install_agent(
        &self,
        project: &ProjectId,
        script: &str,
        env: &[(String, String)],
        interval_secs: u64,
    ) -> Result<(), PlatformError>;

    async fn remove_agent(&self, project: &ProjectId) -> Result<(), PlatformError>;
    async fn start_agent(&self, project: &ProjectId) -> Result<(), PlatformError>;
    async fn stop_agent(&self, project: &ProjectId) -> Result<(), PlatformError>;
    async fn status_agent(&self, project: &ProjectId) -> AgentStatus;
}

async fn run(cmd: &mut Command) -> Result<(), PlatformError> {
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;
    if output.status.success() {
        Ok(())
    } else {
        Err(PlatformError::InstallFailed(String::from_utf8_lossy(&output.stderr).into_owned()))
    }
}

/// macOS launchd-backed implementation.
pub struct LaunchdManager {
    agents_dir: PathBuf,
}

impl LaunchdManager {
    pub fn new(agents_dir: PathBuf) -> Self {
        Self { agents_dir }
    }

    fn plist_path(&self, project: &ProjectId) -> PathBuf {
        self.agents_dir.join(format!("{}.plist", label_for(project)))
    }
}

#[async_trait]
impl DaemonManager for LaunchdManager {
    async fn install_agent(
        &self,
        project: &ProjectId,
        script: &str,
        env: &[(String, String)],
        interval_secs: u64,
    ) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.agents_dir)?;
        let env_entries: String = env
            .iter()
            .map(|(k, v)| format!("<key>{k}</key><string>{v}</string>"))
            .collect();
        let plist = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key><string>{label}</string>
    <key>ProgramArguments</key><array><string>/bin/sh</string><string>-c</string><string>{script}</string></array>
    <key>StartInterval</key><integer>{interval_secs}</integer>
    <key>EnvironmentVariables</key><dict>{env_entries}</dict>
    <key>RunAtLoad</key><true/>
</dict>
</plist>
"#,
            label = label_for(project),
        );
        std::fs::write(self.plist_path(project), plist)?;
        run(Command::new("launchctl").args(["load", "-w"]).arg(self.plist_path(project))).await
    }

    async fn remove_agent(&self, project: &ProjectId) -> Result<(), PlatformError> {
        let path = self.plist_path(project);
        let _ = run(Command::new("launchctl").args(["unload", "-w"]).arg(&path)).await;
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    async fn start_agent(&self, project: &ProjectId) -> Result<(), PlatformError> {
        let uid_output = Command::new("id").arg("-u").output().await?;
        let uid = String::from_utf8_lossy(&uid_output.stdout).trim().to_string();
        run(Command::new("launchctl")
            .args(["kickstart", "-k"])
            .arg(format!("gui/{uid}/{}", label_for(project))))
        .await
    }

    async fn stop_agent(&self, project: &ProjectId) -> Result<(), PlatformError> {
        run(Command::new("launchctl").args(["unload", "-w"]).arg(self.plist_path(project))).await
    }

    async fn status_agent(&self, project: &ProjectId) -> AgentStatus {
        if !self.plist_path(project).exists() {
            return AgentStatus::Unknown;
        }
        match Command::new("launchctl").args(["list", &label_for(project)]).output().await {
            Ok(output) if output.status.success() => AgentStatus::Running,
            Ok(_) => AgentStatus::Stopped,
            Err(_) => AgentStatus::Unknown,
        }
    }
}

/// Linux systemd --user backed implementation.
pub struct SystemdManager {
    units_dir: PathBuf,
}

impl SystemdManager {
    pub fn new(units_dir: PathBuf) -> Self {
        Self { units_dir }
    }

    fn unit_name(project: &ProjectId) -> String {
        format!("{}.service", label_for(project))
    }

    fn unit_path(&self, project: &ProjectId) -> PathBuf {
        self.units_dir.join(Self::unit_name(project))
    }
}

#[async_trait]
impl DaemonManager for SystemdManager {
    async fn install_agent(
        &self,
        project: &ProjectId,
        script: &str,
        env: &[(String, String)],
        interval_secs: u64,
    ) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.units_dir)?;
        let env_lines: String =
            env.iter().map(|(k, v)| format!("Environment={k}={v}\n")).collect();
        let service_name = label_for(project);
        let unit = format!(
            "[Unit]\nDescription=Checkpoint backup agent for {project}\n\n\
             [Service]\nType=oneshot\nExecStart=/bin/sh -c '{script}'\n{env_lines}\n\
             [Install]\nWantedBy=default.target\n"
        );
        let timer = format!(
            "[Unit]\nDescription=Periodic trigger for {service_name}\n\n\
             [Timer]\nOnUnitActiveSec={interval_secs}\nPersistent=true\n\n\
             [Install]\nWantedBy=timers.target\n"
        );
        std::fs::write(self.unit_path(project), unit)?;
        std::fs::write(
            self.units_dir.join(format!("{}.timer", label_for(project))),
            timer,
        )?;
        run(Command::new("systemctl").args(["--user", "daemon-reload"])).await?;
        run(Command::new("systemctl").args([
            "--user",
            "enable",
            "--now",
            &format!("{}.timer", label_for(project)),
        ]))
        .await
    }

    async fn remove_agent(&self, project: &ProjectId) -> Result<(), PlatformError> {
        let _ = run(Command::new("systemctl").args([
            "--user",
            "disable",
            "--now",
            &format!("{}.timer", label_for(project)),
        ]))
        .await;
        for path in [self.unit_path(project), self.units_dir.join(format!("{}.timer", label_for(project)))] {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }
        run(Command::new("systemctl").args(["--user", "daemon-reload"])).await
    }

    async fn start_agent(&self, project: &ProjectId) -> Result<(), PlatformError> {
        run(Command::new("systemctl").args(["--user", "start", &Self::unit_name(project)])).await
    }

    async fn stop_agent(&self, project: &ProjectId) -> Result<(), PlatformError> {
        run(Command::new("systemctl").args(["--user", "stop", &Self::unit_name(project)])).await
    }

    async fn status_agent(&self, project: &ProjectId) -> AgentStatus {
        if !self.unit_path(project).exists() {
            return AgentStatus::Unknown;
        }
        match Command::new("systemctl")
            .args(["--user", "is-active", &format!("{}.timer", label_for(project))])
            .output()
            .await
        {
            Ok(output) if output.status.success() => AgentStatus::Running,
            Ok(_) => AgentStatus::Stopped,
            Err(_) => AgentStatus::Unknown,
        }
    }
}

/// No-op implementation used on unsupported platforms and in tests that
/// don't care about service-manager interaction.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDaemonManager;

#[async_trait]
impl DaemonManager for NullDaemonManager {
    async fn install_agent(
        &self,
        _project: &ProjectId,
        _script: &str,
        _env: &[(String, String)],
        _interval_secs: u64,
    ) -> Result<(), PlatformError> {
        Err(PlatformError::ServiceManagerUnavailable("no service manager on this platform".into()))
    }

    async fn remove_agent(&self, _project: &ProjectId) -> Result<(), PlatformError> {
        Ok(())
    }

    async fn start_agent(&self, _project: &ProjectId) -> Result<(), PlatformError> {
        Err(PlatformError::ServiceManagerUnavailable("no service manager on this platform".into()))
    }

    async fn stop_agent(&self, _project: &ProjectId) -> Result<(), PlatformError> {
        Ok(())
    }

    async fn status_agent(&self, _project: &ProjectId) -> AgentStatus {
        AgentStatus::Unknown
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{AgentStatus, DaemonManager, PlatformError};
    use async_trait::async_trait;
    use checkpoint_core::ProjectId;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeState {
        status: HashMap<ProjectId, AgentStatus>,
        start_should_fail: bool,
        start_calls: u32,
        stop_calls: u32,
    }

    /// Controllable `DaemonManager` for tests that drive restart logic
    /// without a real `launchctl`/`systemctl --user`.
    #[derive(Clone)]
    pub struct FakeDaemonManager {
        inner: Arc<Mutex<FakeState>>,
    }

    impl Default for FakeDaemonManager {
        fn default() -> Self {
            Self { inner: Arc::new(Mutex::new(FakeState::default())) }
        }
    }

    impl FakeDaemonManager {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_start_should_fail(&self, fail: bool) {
            self.inner.lock().start_should_fail = fail;
        }

        pub fn start_calls(&self) -> u32 {
            self.inner.lock().start_calls
        }

        pub fn stop_calls(&self) -> u32 {
            self.inner.lock().stop_calls
        }
    }

    #[async_trait]
    impl DaemonManager for FakeDaemonManager {
        async fn install_agent(
            &self,
            _project: &ProjectId,
            _script: &str,
            _env: &[(String, String)],
            _interval_secs: u64,
        ) -> Result<(), PlatformError> {
            Ok(())
        }

        async fn remove_agent(&self, project: &ProjectId) -> Result<(), PlatformError> {
            self.inner.lock().status.remove(project);
            Ok(())
        }

        async fn start_agent(&self, project: &ProjectId) -> Result<(), PlatformError> {
            let mut state = self.inner.lock();
            state.start_calls += 1;
            if state.start_should_fail {
                return Err(PlatformError::ServiceManagerUnavailable("fake start failure".into()));
            }
            state.status.insert(*project, AgentStatus::Running);
            Ok(())
        }

        async fn stop_agent(&self, project: &ProjectId) -> Result<(), PlatformError> {
            let mut state = self.inner.lock();
            state.stop_calls += 1;
            state.status.insert(*project, AgentStatus::Stopped);
            Ok(())
        }

        async fn status_agent(&self, project: &ProjectId) -> AgentStatus {
            self.inner.lock().status.get(project).copied().unwrap_or(AgentStatus::Unknown)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeDaemonManager;

#[cfg(test)]
#[path = "daemon_manager_tests.rs"]
mod tests;
