use async_trait::async_trait;

use super::{CommandError, CommandGroup, KeyCommand};
use crate::core::key::KeyToken;
use crate::core::platform::{Platform, ProcessMode};
use crate::services::Services;

pub struct RunAndroid;

#[async_trait]
impl KeyCommand for RunAndroid {
    fn key(&self) -> KeyToken {
        KeyToken::Char('a')
    }

    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Android
    }

    fn description(&self) -> &str {
        "Run Android app"
    }

    fn blocks(&self) -> bool {
        false
    }

    fn can_run_in(&self, mode: ProcessMode) -> bool {
        mode == ProcessMode::Start
    }

    async fn execute(&self, _platform: Platform, services: &Services) -> Result<(), CommandError> {
        services.start.run_android().await?;
        Ok(())
    }
}

pub struct RunIos;

#[async_trait]
impl KeyCommand for RunIos {
    fn key(&self) -> KeyToken {
        KeyToken::Char('i')
    }

    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Ios
    }

    fn description(&self) -> &str {
        "Run iOS app"
    }

    fn blocks(&self) -> bool {
        false
    }

    fn can_run_in(&self, mode: ProcessMode) -> bool {
        mode == ProcessMode::Start
    }

    async fn execute(&self, _platform: Platform, services: &Services) -> Result<(), CommandError> {
        services.start.run_ios().await?;
        Ok(())
    }
}
