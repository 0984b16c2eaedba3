use async_trait::async_trait;
use log::info;

use super::{CommandError, CommandGroup, KeyCommand};
use crate::core::key::KeyToken;
use crate::core::platform::Platform;
use crate::services::{LiveSyncOptions, Services};

async fn restart_with(
    platform: Platform,
    options: LiveSyncOptions,
    services: &Services,
) -> Result<(), CommandError> {
    services.live_sync.validate_platform(platform)?;
    let devices = services.live_sync.get_device_instances(platform).await?;
    info!(
        "Restarting live sync on {} device(s) for {} with {:?}",
        devices.len(),
        platform,
        options
    );
    services
        .live_sync
        .execute_live_sync_operation(&devices, platform, options)
        .await?;
    Ok(())
}

pub struct Restart;

impl Restart {
    pub const OPTIONS: LiveSyncOptions = LiveSyncOptions {
        restart_live_sync: true,
        skip_native_prepare: None,
        force_rebuild_native_app: None,
    };
}

#[async_trait]
impl KeyCommand for Restart {
    fn key(&self) -> KeyToken {
        KeyToken::Char('r')
    }

    fn platform(&self) -> Platform {
        Platform::All
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Workflow
    }

    fn description(&self) -> &str {
        "Rebuild native app if needed and restart"
    }

    fn blocks(&self) -> bool {
        true
    }

    async fn execute(&self, platform: Platform, services: &Services) -> Result<(), CommandError> {
        restart_with(platform, Self::OPTIONS, services).await
    }
}

pub struct ForceRebuild;

impl ForceRebuild {
    pub const OPTIONS: LiveSyncOptions = LiveSyncOptions {
        restart_live_sync: true,
        skip_native_prepare: Some(false),
        force_rebuild_native_app: Some(true),
    };
}

#[async_trait]
impl KeyCommand for ForceRebuild {
    fn key(&self) -> KeyToken {
        KeyToken::Char('R')
    }

    fn platform(&self) -> Platform {
        Platform::All
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Workflow
    }

    fn description(&self) -> &str {
        "Force rebuild native app and restart"
    }

    fn blocks(&self) -> bool {
        true
    }

    async fn execute(&self, platform: Platform, services: &Services) -> Result<(), CommandError> {
        restart_with(platform, Self::OPTIONS, services).await
    }
}
