//! # Configuration
//!
//! Which host CLI to drive, where the project lives and where logs go.
//! Later layers win: built-in defaults, `~/.devkeys/config.toml`,
//! `DEVKEYS_*` env vars, then command-line flags.
//!
//! A missing config file is created on first run with every option
//! commented out.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// File layout (every field optional)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DevkeysConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub project: ProjectConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub cli: Option<String>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    pub dir: Option<String>,
    pub platforms_dir: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_CLI: &str = "ns";
pub const DEFAULT_LOG_FILE: &str = "devkeys.log";
pub const DEFAULT_PLATFORMS_DIR: &str = "platforms";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved settings
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub cli: String,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub project_dir: PathBuf,
    /// Absolute, or relative to `project_dir`.
    pub platforms_dir: PathBuf,
}

/// CLI flag overrides. `None` = flag not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub cli: Option<String>,
    pub project_dir: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.devkeys/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".devkeys").join("config.toml"))
}

/// Load config from `~/.devkeys/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DevkeysConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<DevkeysConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(DevkeysConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(DevkeysConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: DevkeysConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# devkeys Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# cli = "ns"                         # Host CLI used for run/prepare/install/clean (DEVKEYS_CLI)
# log_file = "devkeys.log"           # Relative to the working directory
# log_level = "debug"                # "error", "warn", "info", "debug", "trace" (DEVKEYS_LOG_LEVEL)

# [project]
# dir = "."                          # Project root (DEVKEYS_PROJECT_DIR)
# platforms_dir = "platforms"        # Native projects, relative to the project root
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &DevkeysConfig, overrides: &CliOverrides) -> ResolvedConfig {
    // Host CLI: CLI → env → config → default
    let cli = overrides
        .cli
        .clone()
        .or_else(|| std::env::var("DEVKEYS_CLI").ok())
        .or_else(|| config.general.cli.clone())
        .unwrap_or_else(|| DEFAULT_CLI.to_string());

    // Project dir: CLI → env → config → current dir
    let project_dir = overrides
        .project_dir
        .clone()
        .or_else(|| std::env::var("DEVKEYS_PROJECT_DIR").ok().map(PathBuf::from))
        .or_else(|| config.project.dir.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    // Log level: env → config → default. Unknown names fall back with a warning.
    let log_level = std::env::var("DEVKEYS_LOG_LEVEL")
        .ok()
        .or_else(|| config.general.log_level.clone())
        .and_then(|value| {
            let level = parse_level(&value);
            if level.is_none() {
                warn!("Unknown log level '{}', using {}", value, DEFAULT_LOG_LEVEL);
            }
            level
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let platforms = config
        .project
        .platforms_dir
        .clone()
        .unwrap_or_else(|| DEFAULT_PLATFORMS_DIR.to_string());

    ResolvedConfig {
        cli,
        log_file: PathBuf::from(
            config
                .general
                .log_file
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        ),
        log_level,
        platforms_dir: project_dir.join(platforms),
        project_dir,
    }
}
