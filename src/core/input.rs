//! # Input Control
//!
//! The terminal's raw key capture is shared between the dispatcher and any
//! sub-pipeline that needs the terminal for itself (a prepare or install run
//! with inherited stdio). Whoever suspends capture doesn't have to restore
//! it: the command that delegated holds a [`ResumeGuard`] for the duration of
//! the delegation, and the guard resumes capture when it goes out of scope.
//!
//! ```text
//! command effect
//! ├── let _resume = ResumeGuard::new(&input);
//! ├── pipeline.execute(..).await?   // may call input.suspend()
//! └── (drop) → input.resume()       // on Ok, Err and cancellation alike
//! ```

use std::sync::Arc;

pub trait InputControl: Send + Sync {
    /// Stop capturing individual keys and hand the terminal back to cooked mode.
    fn suspend(&self);

    /// Re-enter raw key capture. Must be safe to call when not suspended.
    fn resume(&self);

    fn is_suspended(&self) -> bool;
}

/// Calls [`InputControl::resume`] when dropped.
#[must_use = "the guard resumes input when dropped; bind it to a variable"]
pub struct ResumeGuard {
    input: Arc<dyn InputControl>,
}

impl ResumeGuard {
    pub fn new(input: &Arc<dyn InputControl>) -> Self {
        Self {
            input: Arc::clone(input),
        }
    }
}

impl Drop for ResumeGuard {
    fn drop(&mut self) {
        self.input.resume();
    }
}
