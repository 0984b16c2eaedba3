//! # Core Dispatch Logic
//!
//! Key tokens, the command registry and the dispatcher. Nothing in here
//! touches the terminal or spawns processes directly; those effects go
//! through the traits in [`crate::services`].
//!
//! ```text
//!                    ┌─────────────────────────┐
//!   key token ──────►│       Dispatcher        │
//!                    │  resolve → filter →     │
//!                    │  gate → spawn effect    │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │  Registry  │      │  Commands  │      │  Services  │
//!     │ key → cmd  │      │  effects   │      │  (traits)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`key`]: `KeyToken`, the unit of input
//! - [`platform`]: platform scope, process mode, host OS
//! - [`registry`]: `CommandRegistry`
//! - [`dispatch`]: `Dispatcher` and its exclusivity gate
//! - [`input`]: raw-input suspend/resume capability
//! - [`config`]: `~/.devkeys/config.toml` loading and resolution

pub mod config;
pub mod dispatch;
pub mod input;
pub mod key;
pub mod platform;
pub mod registry;
