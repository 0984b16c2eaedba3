//! # Terminal Adapter
//!
//! The crossterm-specific layer: raw mode, key translation, styled output.
//! This is the only module that knows about crossterm.
//!
//! Raw mode is toggled through [`RawInput`], which implements the core
//! [`InputControl`] capability. Its suspended/captured state is published
//! on a `watch` channel so the session loop can stop reading keys while a
//! child process owns the terminal.

pub mod console;
pub mod event;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::{debug, info, warn};
use tokio::sync::watch;

use crate::core::input::InputControl;

pub struct RawInput {
    suspended: watch::Sender<bool>,
    closed: AtomicBool,
}

impl RawInput {
    /// Enters raw mode.
    pub fn enable() -> std::io::Result<Self> {
        enable_raw_mode()?;
        info!("Raw key capture enabled");
        let (suspended, _) = watch::channel(false);
        Ok(Self {
            suspended,
            closed: AtomicBool::new(false),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.suspended.subscribe()
    }

    /// Leaves raw mode for good. Later `resume` calls (from guards dropped
    /// while the runtime winds down) are ignored.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {}", e);
        }
        info!("Raw key capture closed");
    }
}

impl InputControl for RawInput {
    fn suspend(&self) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to suspend raw mode: {}", e);
        }
        self.suspended.send_replace(true);
        debug!("Raw key capture suspended");
    }

    fn resume(&self) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        if let Err(e) = enable_raw_mode() {
            warn!("Failed to resume raw mode: {}", e);
            return;
        }
        if self.suspended.send_replace(false) {
            debug!("Raw key capture resumed");
        }
    }

    fn is_suspended(&self) -> bool {
        *self.suspended.borrow()
    }
}

/// Closes raw input when the session loop exits, on every path.
pub struct RawModeGuard {
    input: Arc<RawInput>,
}

impl RawModeGuard {
    pub fn new(input: Arc<RawInput>) -> Self {
        Self { input }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.input.close();
    }
}
