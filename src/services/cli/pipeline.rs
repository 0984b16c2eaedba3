use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use tokio::process::Command;

use super::describe;
use crate::core::input::InputControl;
use crate::core::platform::Platform;
use crate::services::{InstallPipeline, PreparePipeline, ServiceError};

/// Runs `prepare` and `install` with the terminal handed over to the child.
///
/// Raw capture is suspended before the child starts and is *not* resumed
/// here: the command that delegated holds the resume guard.
pub struct CliPipeline {
    cli: String,
    project_dir: PathBuf,
    input: Arc<dyn InputControl>,
}

impl CliPipeline {
    pub fn new(cli: String, project_dir: PathBuf, input: Arc<dyn InputControl>) -> Self {
        Self {
            cli,
            project_dir,
            input,
        }
    }

    async fn run_attached(&self, args: Vec<String>) -> Result<(), ServiceError> {
        let description = describe(&self.cli, &args);
        info!("Running `{}` attached to the terminal", description);
        self.input.suspend();

        let status = Command::new(&self.cli)
            .args(&args)
            .current_dir(&self.project_dir)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| ServiceError::Process {
                command: description.clone(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(ServiceError::Process {
                command: description,
                message: format!("exited with {status}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PreparePipeline for CliPipeline {
    async fn execute(&self, platforms: &[Platform]) -> Result<(), ServiceError> {
        for platform in platforms.iter().flat_map(|p| p.targets()) {
            self.run_attached(vec!["prepare".to_string(), platform.as_arg().to_string()])
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl InstallPipeline for CliPipeline {
    async fn execute(&self, args: &[String]) -> Result<(), ServiceError> {
        let mut full = vec!["install".to_string()];
        full.extend_from_slice(args);
        self.run_attached(full).await
    }
}
