//! # Clean
//!
//! Runs `<cli> clean` and streams its output. The clean process reports
//! completion with a fixed phrase but keeps running afterwards, so the
//! command watches the output for either phrase and interrupts the child
//! itself.

use async_trait::async_trait;
use log::{debug, info};

use super::{CommandError, CommandGroup, KeyCommand};
use crate::core::key::KeyToken;
use crate::core::platform::Platform;
use crate::services::Services;

pub const CLEAN_SUCCESS_MARKER: &str = "Project successfully cleaned.";
pub const CLEAN_FAILURE_MARKER: &str = "Project unsuccessfully cleaned.";

/// Detects completion markers in streamed output. A marker split across
/// chunks is still found. Fires at most once.
#[derive(Debug)]
pub struct SentinelScanner {
    markers: &'static [&'static str],
    tail: String,
    keep: usize,
    fired: bool,
}

impl SentinelScanner {
    pub fn new(markers: &'static [&'static str]) -> Self {
        let keep = markers.iter().map(|m| m.len()).max().unwrap_or(1) - 1;
        Self {
            markers,
            tail: String::new(),
            keep,
            fired: false,
        }
    }

    pub fn for_clean() -> Self {
        Self::new(&[CLEAN_SUCCESS_MARKER, CLEAN_FAILURE_MARKER])
    }

    /// Returns `true` for the chunk that completes the first marker.
    pub fn feed(&mut self, chunk: &str) -> bool {
        if self.fired {
            return false;
        }
        let mut window = std::mem::take(&mut self.tail);
        window.push_str(chunk);

        if self.markers.iter().any(|m| window.contains(m)) {
            self.fired = true;
            return true;
        }

        let mut start = window.len().saturating_sub(self.keep);
        while !window.is_char_boundary(start) {
            start += 1;
        }
        self.tail = window.split_off(start);
        false
    }

    pub fn fired(&self) -> bool {
        self.fired
    }
}

pub struct Clean;

#[async_trait]
impl KeyCommand for Clean {
    fn key(&self) -> KeyToken {
        KeyToken::Char('c')
    }

    fn platform(&self) -> Platform {
        Platform::All
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Workflow
    }

    fn description(&self) -> &str {
        "Clean project"
    }

    fn blocks(&self) -> bool {
        true
    }

    async fn execute(&self, _platform: Platform, services: &Services) -> Result<(), CommandError> {
        services.live_sync.stop().await?;

        let args = vec!["clean".to_string()];
        let mut child = services.processes.spawn_streaming(&services.host.cli, &args)?;
        let mut scanner = SentinelScanner::for_clean();

        while let Some(chunk) = child.next_output().await {
            services.console.passthrough(&chunk);
            if scanner.feed(&chunk) {
                info!("Clean reported completion, interrupting it");
                child.interrupt()?;
            }
        }

        child.wait().await?;
        debug!("Clean finished (marker seen: {})", scanner.fired());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;

    #[test]
    fn test_scanner_fires_once() {
        let mut scanner = SentinelScanner::for_clean();
        assert!(!scanner.feed("Cleaning platforms...\n"));
        assert!(scanner.feed("Project successfully cleaned.\n"));
        assert!(!scanner.feed("Project successfully cleaned.\n"));
        assert!(scanner.fired());
    }

    #[test]
    fn test_scanner_matches_marker_split_across_chunks() {
        let mut scanner = SentinelScanner::for_clean();
        assert!(!scanner.feed("Project unsucc"));
        assert!(!scanner.feed("essfully "));
        assert!(scanner.feed("cleaned.\n"));
    }

    #[test]
    fn test_scanner_ignores_similar_text() {
        let mut scanner = SentinelScanner::for_clean();
        assert!(!scanner.feed("Project successfully "));
        assert!(!scanner.feed("prepared.\nProject cleaned"));
        assert!(!scanner.fired());
    }

    #[test]
    fn test_scanner_handles_multibyte_tail() {
        let mut scanner = SentinelScanner::for_clean();
        assert!(!scanner.feed(&"✓ removed node_modules ".repeat(4)));
        assert!(scanner.feed("✓ Project successfully cleaned."));
    }

    #[tokio::test]
    async fn test_clean_interrupts_after_success_marker() {
        let harness = Harness::new();
        harness.spawner.script(&[
            "Removing platforms\n",
            "Removing hooks\n",
            "Project successfully cleaned.\n",
        ]);

        Clean.execute(Platform::All, &harness.services).await.unwrap();

        assert_eq!(harness.live_sync.stop_calls(), 1);
        assert_eq!(
            harness.spawner.spawned(),
            vec![("ns".to_string(), vec!["clean".to_string()])]
        );
        // interrupted exactly once, after the third chunk was delivered
        assert_eq!(harness.spawner.interrupts(), vec![3]);
        assert_eq!(harness.console.passthrough().len(), 3);
    }

    #[tokio::test]
    async fn test_clean_interrupts_after_failure_marker() {
        let harness = Harness::new();
        harness
            .spawner
            .script(&["Project unsuccessfully ", "cleaned.\n", "trailing\n"]);

        Clean.execute(Platform::All, &harness.services).await.unwrap();

        assert_eq!(harness.spawner.interrupts(), vec![2]);
    }

    #[tokio::test]
    async fn test_clean_without_marker_never_interrupts() {
        let harness = Harness::new();
        harness.spawner.script(&["nothing to do\n"]);

        Clean.execute(Platform::All, &harness.services).await.unwrap();

        assert!(harness.spawner.interrupts().is_empty());
    }
}
