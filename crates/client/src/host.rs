//! Host services the client borrows from its environment: blocking dialogs
//! and delayed tasks. The browser, the CLI and tests each provide their own.

use std::time::Duration;

/// Blocking user prompts.
pub trait Dialogs {
    /// Show a message and wait for acknowledgement.
    fn alert(&self, message: &str);

    /// Ask a yes/no question.
    fn confirm(&self, message: &str) -> bool;
}

/// Deferred execution on the client's own thread.
pub trait Scheduler {
    /// Run `task` once after `delay`. Scheduled tasks are never cancelled.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}
