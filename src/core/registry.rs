//! # Command Registry
//!
//! Maps key tokens to commands. Built once when a session starts and then
//! shared read-only with the dispatcher and the help command.
//!
//! Registering a key that is already bound replaces the earlier command in
//! place, so it keeps its position in help output. The replacement is
//! logged; the built-in table never does this.

use std::collections::HashMap;
use std::sync::Arc;

use log::warn;

use crate::commands::{self, KeyCommand};
use crate::core::key::KeyToken;
use crate::core::platform::Platform;

#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<Arc<dyn KeyCommand>>,
    index: HashMap<KeyToken, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in command.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for command in commands::all() {
            registry.register(command);
        }
        registry
    }

    /// Binds `command` to its key. Returns the command it replaced, if any.
    pub fn register(&mut self, command: Arc<dyn KeyCommand>) -> Option<Arc<dyn KeyCommand>> {
        let key = command.key();
        match self.index.get(&key) {
            Some(&slot) => {
                warn!(
                    "Key '{}' registered twice; '{}' replaces '{}'",
                    key,
                    command.description(),
                    self.entries[slot].description()
                );
                Some(std::mem::replace(&mut self.entries[slot], command))
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(command);
                None
            }
        }
    }

    pub fn resolve(&self, key: KeyToken) -> Option<Arc<dyn KeyCommand>> {
        self.index.get(&key).map(|&slot| Arc::clone(&self.entries[slot]))
    }

    /// Commands scoped to `filter` or to all platforms, in registration order.
    /// `Platform::All` lists everything.
    pub fn list(&self, filter: Platform) -> Vec<Arc<dyn KeyCommand>> {
        self.entries
            .iter()
            .filter(|c| {
                filter == Platform::All || c.platform() == Platform::All || c.platform() == filter
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
