//! # IDE Commands
//!
//! `A` opens the Android project in Android Studio, `I` opens the iOS project
//! in Xcode. Both create the native project first if it doesn't exist yet.
//! IDEs are only looked for at their standard install locations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info, trace};

use super::{CommandError, CommandGroup, KeyCommand};
use crate::core::input::ResumeGuard;
use crate::core::key::KeyToken;
use crate::core::platform::{HostOs, Platform};
use crate::services::Services;

pub const ANDROID_STUDIO_MISSING: &str =
    "Android Studio is not installed, or is not in a standard location.";
pub const XCODE_APP: &str = "/Applications/Xcode.app";
pub const XCODE_MISSING: &str = "Xcode is not installed.";
pub const XCODE_UNSUPPORTED_HOST: &str = "Xcode is only available on macOS.";

/// Standard Android Studio locations for a host, in probe order.
pub fn android_studio_candidates(os: HostOs, home: Option<&Path>) -> Vec<PathBuf> {
    match os {
        HostOs::MacOs => {
            let mut paths = vec![PathBuf::from("/Applications/Android Studio.app")];
            if let Some(home) = home {
                paths.push(home.join("Applications").join("Android Studio.app"));
            }
            paths
        }
        HostOs::Windows => vec![PathBuf::from(
            r"C:\Program Files\Android\Android Studio\bin\studio64.exe",
        )],
        HostOs::Linux => vec![PathBuf::from("/usr/local/android-studio/bin/studio.sh")],
        HostOs::Other => Vec::new(),
    }
}

/// Creates `<platforms>/<platform>` through the prepare pipeline if missing.
async fn ensure_native_dir(
    platform: Platform,
    services: &Services,
) -> Result<PathBuf, CommandError> {
    services.live_sync.validate_platform(platform)?;
    services.project.initialize_project_data()?;
    let native_dir = services.project.platforms_dir().join(platform.as_arg());

    if !services.fs.exists(&native_dir) {
        info!(
            "{} not found, preparing {} first",
            native_dir.display(),
            platform
        );
        let _resume = ResumeGuard::new(&services.input);
        services.prepare.execute(&[platform]).await?;
    }
    Ok(native_dir)
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

pub struct OpenAndroidStudio;

#[async_trait]
impl KeyCommand for OpenAndroidStudio {
    fn key(&self) -> KeyToken {
        KeyToken::Char('A')
    }

    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Android
    }

    fn description(&self) -> &str {
        "Open project in Android Studio"
    }

    fn blocks(&self) -> bool {
        true
    }

    async fn execute(&self, _platform: Platform, services: &Services) -> Result<(), CommandError> {
        let android_dir = ensure_native_dir(Platform::Android, services).await?;

        let candidates = android_studio_candidates(services.host.os, services.host.home.as_deref());
        let studio = candidates.into_iter().find(|path| {
            trace!("Checking for Android Studio at {}", path.display());
            services.fs.exists(path)
        });
        let Some(studio) = studio else {
            services.console.error(ANDROID_STUDIO_MISSING);
            return Ok(());
        };

        debug!("Launching Android Studio from {}", studio.display());
        match services.host.os {
            HostOs::MacOs => services.processes.launch(
                "open",
                &["-a".to_string(), path_arg(&studio), path_arg(&android_dir)],
            )?,
            _ => services
                .processes
                .launch(&path_arg(&studio), &[path_arg(&android_dir)])?,
        }
        Ok(())
    }
}

pub struct OpenXcode;

impl OpenXcode {
    /// Prefers the CocoaPods workspace, then the bare project, then the folder.
    fn project_path(ios_dir: &Path, services: &Services) -> PathBuf {
        let entries = match services.fs.read_dir(ios_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Could not list {}: {}", ios_dir.display(), e);
                return ios_dir.to_path_buf();
            }
        };
        let with_extension = |ext: &str| {
            let mut matches: Vec<&PathBuf> = entries
                .iter()
                .filter(|p| p.extension().is_some_and(|e| e == ext))
                .collect();
            matches.sort();
            matches.first().map(|p| (*p).clone())
        };
        with_extension("xcworkspace")
            .or_else(|| with_extension("xcodeproj"))
            .unwrap_or_else(|| ios_dir.to_path_buf())
    }
}

#[async_trait]
impl KeyCommand for OpenXcode {
    fn key(&self) -> KeyToken {
        KeyToken::Char('I')
    }

    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Ios
    }

    fn description(&self) -> &str {
        "Open project in Xcode"
    }

    fn blocks(&self) -> bool {
        true
    }

    async fn execute(&self, _platform: Platform, services: &Services) -> Result<(), CommandError> {
        if services.host.os != HostOs::MacOs {
            services.console.error(XCODE_UNSUPPORTED_HOST);
            return Ok(());
        }
        let ios_dir = ensure_native_dir(Platform::Ios, services).await?;

        if !services.fs.exists(Path::new(XCODE_APP)) {
            services.console.error(XCODE_MISSING);
            return Ok(());
        }

        let project = Self::project_path(&ios_dir, services);
        debug!("Opening {} in Xcode", project.display());
        services.processes.launch("open", &[path_arg(&project)])?;
        Ok(())
    }
}
