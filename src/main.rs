use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use devkeys::core::config::{self, CliOverrides};
use devkeys::{Platform, ProcessMode};
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Subcommand)]
enum SessionCommand {
    /// Wait for a platform key before launching the app
    Start,
    /// Run the app and attach the key commands
    Run {
        /// Target platform (android, ios); anything else targets both
        #[arg(default_value = "all")]
        platform: String,
    },
    /// Debug the app and attach the key commands
    Debug {
        #[arg(default_value = "all")]
        platform: String,
    },
}

#[derive(Parser)]
#[command(name = "devkeys", about = "Keyboard shortcuts for a live development session")]
struct Args {
    #[command(subcommand)]
    command: Option<SessionCommand>,

    /// Host CLI binary used for run, prepare, install and clean
    #[arg(long, global = true)]
    cli: Option<String>,

    /// Project root directory
    #[arg(long, global = true)]
    project: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (mode, platform) = match args.command.unwrap_or(SessionCommand::Start) {
        SessionCommand::Start => (ProcessMode::Start, Platform::All),
        SessionCommand::Run { platform } => (ProcessMode::Run, Platform::normalize(&platform)),
        SessionCommand::Debug { platform } => (ProcessMode::Debug, Platform::normalize(&platform)),
    };

    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (config::DevkeysConfig::default(), Some(e)),
    };
    let overrides = CliOverrides {
        cli: args.cli,
        project_dir: args.project,
    };
    let config = config::resolve(&file_config, &overrides);

    // File logger: stdout belongs to the raw-mode key loop
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&config.log_file) {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }
    log::info!(
        "devkeys starting: {:?} session for {} in {} (cli: {})",
        mode,
        platform,
        config.project_dir.display(),
        config.cli
    );

    devkeys::session::run(config, platform, mode).await
}
