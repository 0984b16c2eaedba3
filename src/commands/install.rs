use async_trait::async_trait;

use super::{CommandError, CommandGroup, KeyCommand};
use crate::core::input::ResumeGuard;
use crate::core::key::KeyToken;
use crate::core::platform::Platform;
use crate::services::Services;

pub struct Install;

#[async_trait]
impl KeyCommand for Install {
    fn key(&self) -> KeyToken {
        KeyToken::Char('n')
    }

    fn platform(&self) -> Platform {
        Platform::All
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Workflow
    }

    fn description(&self) -> &str {
        "Install dependencies"
    }

    fn blocks(&self) -> bool {
        true
    }

    async fn execute(&self, _platform: Platform, services: &Services) -> Result<(), CommandError> {
        let _resume = ResumeGuard::new(&services.input);
        services.install.execute(&[]).await?;
        Ok(())
    }
}
