//! # Dispatcher
//!
//! Turns one key token into at most one command execution.
//!
//! ```text
//!            key ──► resolve ──► terminate? ──yes──► Terminate
//!                                   │no
//!                             gate busy? ──yes──► Busy (dropped)
//!                                   │no
//!                   platform / mode applies? ──no──► Inapplicable
//!                                   │yes
//!                 blocks? ──no──► spawn ──► Detached
//!                    │yes
//!     take permit ──► spawn (permit moves in) ──► Started
//!                                   │
//!                  settle (Ok / Err / panic) ──► permit dropped ──► Idle
//! ```
//!
//! The exclusivity gate is a one-permit semaphore. Only `dispatch` takes the
//! permit and only the spawned task holds it, so the gate frees itself on
//! every way that task can end, including a panic or an abort.

use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::commands::KeyCommand;
use crate::core::key::KeyToken;
use crate::core::platform::{Platform, ProcessMode};
use crate::core::registry::CommandRegistry;
use crate::services::Services;

/// What happened to a key.
#[derive(Debug)]
pub enum Dispatch {
    /// The terminate key. The session must end now.
    Terminate,
    /// A blocking command is running; the key was dropped.
    Busy,
    /// No command is bound to the key.
    Unbound,
    /// The bound command doesn't apply to this session's platform or mode.
    Inapplicable,
    /// A non-blocking command was started.
    Detached(JoinHandle<()>),
    /// A blocking command was started and holds the gate until it settles.
    Started(JoinHandle<()>),
}

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    services: Arc<Services>,
    gate: Arc<Semaphore>,
    platform: Platform,
    mode: ProcessMode,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<CommandRegistry>,
        services: Arc<Services>,
        platform: Platform,
        mode: ProcessMode,
    ) -> Self {
        Self {
            registry,
            services,
            gate: Arc::new(Semaphore::new(1)),
            platform,
            mode,
        }
    }

    /// True while a blocking command is in flight.
    pub fn is_busy(&self) -> bool {
        self.gate.available_permits() == 0
    }

    fn applies(&self, command: &dyn KeyCommand) -> bool {
        command.platform().applies_to(self.platform) && command.can_run_in(self.mode)
    }

    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, key: KeyToken) -> Dispatch {
        let Some(command) = self.registry.resolve(key) else {
            debug!("No command bound to '{}'", key);
            return Dispatch::Unbound;
        };

        if command.terminates() {
            info!("Terminate requested (busy: {})", self.is_busy());
            return Dispatch::Terminate;
        }

        if self.is_busy() {
            debug!("Dropping '{}' while a blocking command runs", key);
            return Dispatch::Busy;
        }

        if !self.applies(command.as_ref()) {
            debug!(
                "'{}' does not apply to {} in {:?} mode",
                key, self.platform, self.mode
            );
            return Dispatch::Inapplicable;
        }

        if !command.blocks() {
            info!("Running '{}' ({})", key, command.description());
            return Dispatch::Detached(self.spawn(command, None));
        }

        match Arc::clone(&self.gate).try_acquire_owned() {
            Ok(permit) => {
                info!("Running blocking '{}' ({})", key, command.description());
                Dispatch::Started(self.spawn(command, Some(permit)))
            }
            Err(_) => Dispatch::Busy,
        }
    }

    fn spawn(
        &self,
        command: Arc<dyn KeyCommand>,
        permit: Option<tokio::sync::OwnedSemaphorePermit>,
    ) -> JoinHandle<()> {
        let services = Arc::clone(&self.services);
        let platform = self.platform;
        tokio::spawn(async move {
            let _permit = permit;
            match command.execute(platform, &services).await {
                Ok(()) => debug!("'{}' finished", command.key()),
                Err(e) => {
                    error!("'{}' failed: {}", command.key(), e);
                    services
                        .console
                        .error(&format!("{} failed: {}", command.description(), e));
                }
            }
        })
    }
}
