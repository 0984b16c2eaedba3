//! # Collaborator Capabilities
//!
//! Everything a key command delegates to lives behind one of these traits.
//! The dispatcher never reaches past them: the rebuild engine, device
//! discovery, the prepare and install pipelines and process spawning are
//! somebody else's job.
//!
//! ```text
//! Services
//! ├── start: Arc<dyn StartService>           // run Android / run iOS
//! ├── live_sync: Arc<dyn LiveSync>           // devices, restart, stop
//! ├── prepare: Arc<dyn PreparePipeline>      // create native projects
//! ├── install: Arc<dyn InstallPipeline>      // install dependencies
//! ├── watcher: Arc<dyn PrepareController>    // pause/resume file watching
//! ├── project: Arc<dyn ProjectData>          // platforms dir
//! ├── processes: Arc<dyn ProcessSpawner>     // clean child, IDE launches
//! ├── fs: Arc<dyn FileSystem>                // IDE probes
//! ├── console: Arc<dyn Console>              // user-visible output
//! ├── input: Arc<dyn InputControl>           // raw capture on/off
//! └── registry: OnceLock<Arc<CommandRegistry>>
//! ```
//!
//! [`cli`] has the process-backed implementations used by the binary.

pub mod cli;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::input::InputControl;
use crate::core::platform::{HostOs, Platform};
use crate::core::registry::CommandRegistry;

/// Errors a collaborator can report back to a command.
#[derive(Debug)]
pub enum ServiceError {
    /// The operation isn't available here (wrong host OS, no session).
    Unsupported(String),
    /// A child process couldn't be started or exited unsuccessfully.
    Process { command: String, message: String },
    Io(io::Error),
    /// Collaborator output didn't have the expected shape.
    Parse(String),
    /// The project or platform isn't in a usable state.
    Validation(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Unsupported(msg) => write!(f, "unsupported: {msg}"),
            ServiceError::Process { command, message } => {
                write!(f, "`{command}` failed: {message}")
            }
            ServiceError::Io(e) => write!(f, "I/O error: {e}"),
            ServiceError::Parse(msg) => write!(f, "parse error: {msg}"),
            ServiceError::Validation(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ServiceError {
    fn from(e: io::Error) -> Self {
        ServiceError::Io(e)
    }
}

/// A device the live-sync engine can deploy to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub identifier: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Flags for a live-sync operation. `None` leaves the engine's default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveSyncOptions {
    pub restart_live_sync: bool,
    pub skip_native_prepare: Option<bool>,
    pub force_rebuild_native_app: Option<bool>,
}

#[async_trait]
pub trait StartService: Send + Sync {
    async fn run_android(&self) -> Result<(), ServiceError>;
    async fn run_ios(&self) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait LiveSync: Send + Sync {
    fn validate_platform(&self, platform: Platform) -> Result<(), ServiceError>;

    async fn get_device_instances(&self, platform: Platform) -> Result<Vec<Device>, ServiceError>;

    async fn execute_live_sync_operation(
        &self,
        devices: &[Device],
        platform: Platform,
        options: LiveSyncOptions,
    ) -> Result<(), ServiceError>;

    /// Stops the active live-sync session, if any.
    async fn stop(&self) -> Result<(), ServiceError>;
}

/// Creates the native projects for the given platforms. May suspend raw input.
#[async_trait]
pub trait PreparePipeline: Send + Sync {
    async fn execute(&self, platforms: &[Platform]) -> Result<(), ServiceError>;
}

/// Installs project dependencies. May suspend raw input.
#[async_trait]
pub trait InstallPipeline: Send + Sync {
    async fn execute(&self, args: &[String]) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait PrepareController: Send + Sync {
    /// Flips file watching. Returns `true` if watching is now paused.
    async fn toggle_file_watcher(&self) -> Result<bool, ServiceError>;
}

pub trait ProjectData: Send + Sync {
    fn initialize_project_data(&self) -> Result<(), ServiceError>;
    fn platforms_dir(&self) -> PathBuf;
}

pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// A child whose combined stdout/stderr is consumed chunk by chunk.
#[async_trait]
pub trait StreamingProcess: Send {
    /// Next chunk of output, `None` once both streams are closed.
    async fn next_output(&mut self) -> Option<String>;

    /// Sends the interrupt signal (SIGINT on unix).
    fn interrupt(&mut self) -> Result<(), ServiceError>;

    async fn wait(&mut self) -> Result<(), ServiceError>;
}

pub trait ProcessSpawner: Send + Sync {
    fn spawn_streaming(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<Box<dyn StreamingProcess>, ServiceError>;

    /// Starts a detached program (an IDE) without waiting for it.
    fn launch(&self, program: &str, args: &[String]) -> Result<(), ServiceError>;
}

/// How a console line should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Muted,
    Success,
    Heading,
    Error,
}

pub trait Console: Send + Sync {
    /// Writes one line.
    fn line(&self, tone: Tone, text: &str);

    /// Writes child output verbatim.
    fn passthrough(&self, text: &str);

    fn error(&self, text: &str) {
        self.line(Tone::Error, text);
    }
}

/// The host CLI and OS facts commands need.
#[derive(Debug, Clone)]
pub struct HostEnv {
    pub os: HostOs,
    pub home: Option<PathBuf>,
    /// Program invoked for host CLI subcommands such as `clean`.
    pub cli: String,
}

impl HostEnv {
    pub fn detect(cli: String) -> Self {
        Self {
            os: HostOs::current(),
            home: dirs::home_dir(),
            cli,
        }
    }
}

pub struct Services {
    pub start: Arc<dyn StartService>,
    pub live_sync: Arc<dyn LiveSync>,
    pub prepare: Arc<dyn PreparePipeline>,
    pub install: Arc<dyn InstallPipeline>,
    pub watcher: Arc<dyn PrepareController>,
    pub project: Arc<dyn ProjectData>,
    pub processes: Arc<dyn ProcessSpawner>,
    pub fs: Arc<dyn FileSystem>,
    pub console: Arc<dyn Console>,
    pub input: Arc<dyn InputControl>,
    pub host: HostEnv,
    /// Filled once the registry is built; the help command renders from it.
    pub registry: OnceLock<Arc<CommandRegistry>>,
}

impl Services {
    pub fn attach_registry(&self, registry: Arc<CommandRegistry>) {
        if self.registry.set(registry).is_err() {
            log::warn!("Command registry already attached; keeping the first one");
        }
    }
}
