//! devkeys library exports for testing

pub mod commands;
pub mod core;
pub mod services;
pub mod session;
pub mod terminal;

#[cfg(test)]
pub mod test_support;

pub use crate::core::platform::{Platform, ProcessMode};
