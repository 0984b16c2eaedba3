use async_trait::async_trait;

use super::{CommandError, CommandGroup, KeyCommand};
use crate::core::key::KeyToken;
use crate::core::platform::Platform;
use crate::services::Services;

/// Ctrl+C. The dispatcher turns this into [`Dispatch::Terminate`] before
/// any state check, so `execute` never runs in a session.
///
/// [`Dispatch::Terminate`]: crate::core::dispatch::Dispatch::Terminate
pub struct Quit;

#[async_trait]
impl KeyCommand for Quit {
    fn key(&self) -> KeyToken {
        KeyToken::Interrupt
    }

    fn platform(&self) -> Platform {
        Platform::All
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Workflow
    }

    fn description(&self) -> &str {
        "Quit"
    }

    fn blocks(&self) -> bool {
        false
    }

    fn terminates(&self) -> bool {
        true
    }

    async fn execute(&self, _platform: Platform, _services: &Services) -> Result<(), CommandError> {
        Ok(())
    }
}
