//! # Key Commands
//!
//! Every key binding is a unit struct implementing [`KeyCommand`]. The
//! descriptor half (`key`, `platform`, `blocks`, `can_run_in`) is fixed per
//! type; the effect half is `execute`, which only talks to [`Services`].
//!
//! Commands are registered in [`all()`]; registration order is help order.

mod clean;
mod help;
mod ide;
mod install;
mod live_sync;
mod quit;
mod run;
mod watcher;

pub use clean::{CLEAN_FAILURE_MARKER, CLEAN_SUCCESS_MARKER, Clean, SentinelScanner};
pub use help::{Help, render_help};
pub use ide::{
    ANDROID_STUDIO_MISSING, OpenAndroidStudio, OpenXcode, XCODE_APP, XCODE_MISSING,
    XCODE_UNSUPPORTED_HOST, android_studio_candidates,
};
pub use install::Install;
pub use live_sync::{ForceRebuild, Restart};
pub use quit::Quit;
pub use run::{RunAndroid, RunIos};
pub use watcher::{RESUMED_MESSAGE, PAUSED_MESSAGE, ToggleWatcher};

use std::fmt;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::key::KeyToken;
use crate::core::platform::{Platform, ProcessMode};
use crate::services::{ServiceError, Services};

/// Section a command is listed under in help output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Android,
    Ios,
    Workflow,
}

impl CommandGroup {
    pub fn title(self) -> &'static str {
        match self {
            CommandGroup::Android => "Android",
            CommandGroup::Ios => "iOS",
            CommandGroup::Workflow => "Development Workflow",
        }
    }
}

#[derive(Debug)]
pub enum CommandError {
    Service(ServiceError),
    Io(io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Service(e) => write!(f, "{e}"),
            CommandError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Service(e) => Some(e),
            CommandError::Io(e) => Some(e),
        }
    }
}

impl From<ServiceError> for CommandError {
    fn from(e: ServiceError) -> Self {
        CommandError::Service(e)
    }
}

impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self {
        CommandError::Io(e)
    }
}

#[async_trait]
pub trait KeyCommand: Send + Sync {
    fn key(&self) -> KeyToken;

    fn platform(&self) -> Platform;

    fn group(&self) -> CommandGroup;

    fn description(&self) -> &str;

    /// Blocking commands hold the dispatcher's exclusivity gate while they run.
    fn blocks(&self) -> bool;

    /// Only the terminate command returns `true`. It is honored in every
    /// dispatcher state and ends the session instead of running `execute`.
    fn terminates(&self) -> bool {
        false
    }

    fn can_run_in(&self, _mode: ProcessMode) -> bool {
        true
    }

    /// `platform` is the session's platform context.
    async fn execute(&self, platform: Platform, services: &Services) -> Result<(), CommandError>;
}

/// The full built-in key binding table, in help order.
pub fn all() -> Vec<Arc<dyn KeyCommand>> {
    vec![
        Arc::new(RunAndroid),
        Arc::new(OpenAndroidStudio),
        Arc::new(RunIos),
        Arc::new(OpenXcode),
        Arc::new(Restart),
        Arc::new(ForceRebuild),
        Arc::new(ToggleWatcher),
        Arc::new(Clean),
        Arc::new(Install),
        Arc::new(Help),
        Arc::new(Quit),
    ]
}
