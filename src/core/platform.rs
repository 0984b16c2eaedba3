//! # Platforms and Modes
//!
//! `Platform` is used both as a command's scope and as the session's
//! platform context. As a context, `All` means the session targets both
//! Android and iOS.

use clap::ValueEnum;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Platform {
    Android,
    #[value(name = "ios")]
    Ios,
    #[default]
    All,
}

impl Platform {
    /// Case-insensitive normalization of a free-form platform argument.
    /// Anything that isn't `android` or `ios` maps to `All`.
    pub fn normalize(input: &str) -> Platform {
        match input.trim().to_lowercase().as_str() {
            "android" => Platform::Android,
            "ios" => Platform::Ios,
            _ => Platform::All,
        }
    }

    /// Whether a command scoped to `self` applies to a session targeting `context`.
    pub fn applies_to(self, context: Platform) -> bool {
        self == Platform::All || context == Platform::All || self == context
    }

    /// Lowercase name as the host CLI expects it (`android`, `ios`, `all`).
    pub fn as_arg(self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::All => "all",
        }
    }

    /// The concrete platforms this value stands for.
    pub fn targets(self) -> &'static [Platform] {
        match self {
            Platform::Android => &[Platform::Android],
            Platform::Ios => &[Platform::Ios],
            Platform::All => &[Platform::Android, Platform::Ios],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => write!(f, "Android"),
            Platform::Ios => write!(f, "iOS"),
            Platform::All => write!(f, "all"),
        }
    }
}

/// What kind of session the dispatcher is attached to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ProcessMode {
    /// No app is running yet; the user picks a platform with a key.
    #[default]
    Start,
    Run,
    Debug,
}

impl ProcessMode {
    /// Host CLI subcommand for a session in this mode. `Start` sessions
    /// launch their app with `run`.
    pub fn as_arg(self) -> &'static str {
        match self {
            ProcessMode::Start | ProcessMode::Run => "run",
            ProcessMode::Debug => "debug",
        }
    }
}

/// Desktop OS the dispatcher runs on. Decides where IDEs are looked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostOs {
    MacOs,
    Windows,
    Linux,
    Other,
}

impl HostOs {
    pub fn current() -> HostOs {
        match std::env::consts::OS {
            "macos" => HostOs::MacOs,
            "windows" => HostOs::Windows,
            "linux" => HostOs::Linux,
            _ => HostOs::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_case_insensitive() {
        assert_eq!(Platform::normalize("IOS"), Platform::Ios);
        assert_eq!(Platform::normalize("iOS"), Platform::Ios);
        assert_eq!(Platform::normalize("Android"), Platform::Android);
    }

    #[test]
    fn test_normalize_unknown_maps_to_all() {
        assert_eq!(Platform::normalize("xyz"), Platform::All);
        assert_eq!(Platform::normalize(""), Platform::All);
    }

    #[test]
    fn test_scoped_platform_applies_only_to_matching_context() {
        assert!(Platform::Android.applies_to(Platform::Android));
        assert!(!Platform::Android.applies_to(Platform::Ios));
        assert!(!Platform::Ios.applies_to(Platform::Android));
        assert!(Platform::Ios.applies_to(Platform::All));
        assert!(Platform::All.applies_to(Platform::Ios));
    }

    #[test]
    fn test_targets_expand_all() {
        assert_eq!(Platform::All.targets(), &[Platform::Android, Platform::Ios]);
        assert_eq!(Platform::Ios.targets(), &[Platform::Ios]);
    }
}
