use async_trait::async_trait;
use log::warn;

use super::{CommandError, CommandGroup, KeyCommand};
use crate::core::input::ResumeGuard;
use crate::core::key::KeyToken;
use crate::core::platform::Platform;
use crate::core::registry::CommandRegistry;
use crate::services::{Services, Tone};

/// Help text for the commands relevant to `filter`, as `(tone, line)` pairs.
///
/// Commands are listed in registration order; a group title is emitted each
/// time the group changes.
pub fn render_help(registry: &CommandRegistry, filter: Platform) -> Vec<(Tone, String)> {
    let mut lines = vec![(Tone::Heading, "Keyboard shortcuts".to_string())];
    let mut current: Option<CommandGroup> = None;

    for command in registry.list(filter) {
        if current != Some(command.group()) {
            current = Some(command.group());
            lines.push((Tone::Muted, format!("  {}", command.group().title())));
        }
        lines.push((
            Tone::Plain,
            format!("    {:<8}{}", command.key().to_string(), command.description()),
        ));
    }
    lines
}

pub struct Help;

#[async_trait]
impl KeyCommand for Help {
    fn key(&self) -> KeyToken {
        KeyToken::HelpMark
    }

    fn platform(&self) -> Platform {
        Platform::All
    }

    fn group(&self) -> CommandGroup {
        CommandGroup::Workflow
    }

    fn description(&self) -> &str {
        "Show this help"
    }

    fn blocks(&self) -> bool {
        true
    }

    async fn execute(&self, platform: Platform, services: &Services) -> Result<(), CommandError> {
        let _resume = ResumeGuard::new(&services.input);

        let Some(registry) = services.registry.get() else {
            warn!("Help requested before the command registry was attached");
            return Ok(());
        };
        for (tone, line) in render_help(registry, platform) {
            services.console.line(tone, &line);
        }
        Ok(())
    }
}
