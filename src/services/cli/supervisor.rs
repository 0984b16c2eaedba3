//! # Session Supervisor
//!
//! Owns the long-running dev session child (`<cli> run <platform>` or
//! `<cli> debug <platform>`). Restarting means replacing that child,
//! pausing the file watcher means stopping it until resumed.
//!
//! ```text
//! SessionState
//! ├── child: Option<Child>          // the running session, if any
//! ├── platform: Option<Platform>    // what the last session targeted
//! ├── devices: Vec<String>          // device ids of the last session
//! ├── options: LiveSyncOptions      // flags of the last session
//! └── paused: bool                  // watcher paused via 'w'
//! ```
//!
//! The state lock is never held across an await.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::process::{Child, Command};

use super::describe;
use super::devices::parse_devices;
use super::process::spawn_piped;
use crate::core::platform::{HostOs, Platform, ProcessMode};
use crate::services::{
    Console, Device, LiveSync, LiveSyncOptions, PrepareController, ServiceError, StartService,
};

#[derive(Default)]
struct SessionState {
    child: Option<Child>,
    platform: Option<Platform>,
    devices: Vec<String>,
    options: LiveSyncOptions,
    paused: bool,
}

pub struct SessionSupervisor {
    cli: String,
    project_dir: PathBuf,
    mode: ProcessMode,
    host: HostOs,
    console: Arc<dyn Console>,
    state: Mutex<SessionState>,
}

/// Host CLI arguments for a session child.
fn session_args(
    mode: ProcessMode,
    platform: Platform,
    devices: &[String],
    options: LiveSyncOptions,
) -> Vec<String> {
    let mut args = vec![mode.as_arg().to_string()];
    if platform != Platform::All {
        args.push(platform.as_arg().to_string());
    }
    if let [device] = devices {
        args.push("--device".to_string());
        args.push(device.clone());
    }
    if options.force_rebuild_native_app == Some(true) {
        args.push("--force".to_string());
    }
    if options.skip_native_prepare == Some(true) {
        args.push("--skip-native-prepare".to_string());
    }
    args
}

impl SessionSupervisor {
    pub fn new(
        cli: String,
        project_dir: PathBuf,
        mode: ProcessMode,
        host: HostOs,
        console: Arc<dyn Console>,
    ) -> Self {
        Self {
            cli,
            project_dir,
            mode,
            host,
            console,
            state: Mutex::new(SessionState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        // a panic elsewhere doesn't invalidate the child handle
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn spawn_child(
        &self,
        platform: Platform,
        devices: &[String],
        options: LiveSyncOptions,
    ) -> Result<Child, ServiceError> {
        let args = session_args(self.mode, platform, devices, options);
        let description = describe(&self.cli, &args);
        info!("Starting session `{}`", description);

        let mut command = Command::new(&self.cli);
        command.args(&args).current_dir(&self.project_dir);
        let (child, mut output) = spawn_piped(&mut command, &description)?;

        let console = Arc::clone(&self.console);
        tokio::spawn(async move {
            while let Some(chunk) = output.recv().await {
                console.passthrough(&chunk);
            }
            debug!("Session output closed");
        });
        Ok(child)
    }

    /// Replaces any running session with a new one.
    pub fn launch(
        &self,
        platform: Platform,
        devices: Vec<String>,
        options: LiveSyncOptions,
    ) -> Result<(), ServiceError> {
        let child = self.spawn_child(platform, &devices, options)?;
        let mut state = self.state();
        if let Some(mut old) = state.child.replace(child) {
            if let Err(e) = old.start_kill() {
                debug!("Previous session already gone: {}", e);
            }
        }
        state.platform = Some(platform);
        state.devices = devices;
        state.options = options;
        state.paused = false;
        Ok(())
    }

    fn kill_current(&self) -> bool {
        let child = self.state().child.take();
        match child {
            Some(mut child) => {
                if let Err(e) = child.start_kill() {
                    warn!("Failed to stop session: {}", e);
                }
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state().child.is_some()
    }
}

#[async_trait]
impl StartService for SessionSupervisor {
    async fn run_android(&self) -> Result<(), ServiceError> {
        self.validate_platform(Platform::Android)?;
        self.launch(Platform::Android, Vec::new(), LiveSyncOptions::default())
    }

    async fn run_ios(&self) -> Result<(), ServiceError> {
        self.validate_platform(Platform::Ios)?;
        self.launch(Platform::Ios, Vec::new(), LiveSyncOptions::default())
    }
}

#[async_trait]
impl LiveSync for SessionSupervisor {
    fn validate_platform(&self, platform: Platform) -> Result<(), ServiceError> {
        if !self.project_dir.is_dir() {
            return Err(ServiceError::Validation(format!(
                "No project found at {}",
                self.project_dir.display()
            )));
        }
        if platform == Platform::Ios && self.host != HostOs::MacOs {
            return Err(ServiceError::Validation(
                "iOS builds are only supported on macOS".to_string(),
            ));
        }
        Ok(())
    }

    async fn get_device_instances(&self, platform: Platform) -> Result<Vec<Device>, ServiceError> {
        let mut args = vec!["device".to_string()];
        if platform != Platform::All {
            args.push(platform.as_arg().to_string());
        }
        args.push("--json".to_string());
        let description = describe(&self.cli, &args);
        debug!("Listing devices with `{}`", description);

        let output = Command::new(&self.cli)
            .args(&args)
            .current_dir(&self.project_dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ServiceError::Process {
                command: description.clone(),
                message: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(ServiceError::Process {
                command: description,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        parse_devices(&String::from_utf8_lossy(&output.stdout))
    }

    async fn execute_live_sync_operation(
        &self,
        devices: &[Device],
        platform: Platform,
        options: LiveSyncOptions,
    ) -> Result<(), ServiceError> {
        if !options.restart_live_sync && self.is_running() {
            debug!("Live sync already running and no restart requested");
            return Ok(());
        }
        let ids = devices.iter().map(|d| d.identifier.clone()).collect();
        self.launch(platform, ids, options)
    }

    async fn stop(&self) -> Result<(), ServiceError> {
        if self.kill_current() {
            info!("Live sync session stopped");
        }
        Ok(())
    }
}

#[async_trait]
impl PrepareController for SessionSupervisor {
    async fn toggle_file_watcher(&self) -> Result<bool, ServiceError> {
        let resume_with = {
            let state = self.state();
            if state.paused {
                Some((state.platform.unwrap_or_default(), state.devices.clone(), state.options))
            } else {
                None
            }
        };

        if let Some((platform, devices, options)) = resume_with {
            self.launch(platform, devices, options)?;
            return Ok(false);
        }

        if !self.kill_current() {
            return Err(ServiceError::Unsupported(
                "no running session to pause".to_string(),
            ));
        }
        self.state().paused = true;
        Ok(true)
    }
}
