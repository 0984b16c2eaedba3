use async_trait::async_trait;
use log::debug;

use super::{CommandError, CommandGroup, KeyCommand};
use crate::core::key::KeyToken;
use crate::core::platform::Platform;
use crate::services::{Services, Tone};

pub const PAUSED_MESSAGE: &str = "Paused watching file changes... Press 'w' to resume.";
pub const RESUMED_MESSAGE: &str = "Resumed watching file changes";

pub struct ToggleWatcher;

#[async_trait]
impl KeyCommand for ToggleWatcher {
    fn key(&self) -> KeyToken {
        KeyToken::Char('w')
    }

    fn platform(&self) -> Platform {
        Platform::All
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Workflow
    }

    fn description(&self) -> &str {
        "Toggle file watcher"
    }

    fn blocks(&self) -> bool {
        true
    }

    /// Toggle failures are not surfaced to the user.
    async fn execute(&self, _platform: Platform, services: &Services) -> Result<(), CommandError> {
        match services.watcher.toggle_file_watcher().await {
            Ok(true) => services.console.line(Tone::Muted, PAUSED_MESSAGE),
            Ok(false) => services.console.line(Tone::Success, RESUMED_MESSAGE),
            Err(e) => debug!("Ignoring file watcher toggle failure: {}", e),
        }
        Ok(())
    }
}
