//! Host services for running the client outside a browser.

use std::io::{BufRead, Write};
use std::time::Duration;

use crate::host::{Dialogs, Scheduler};

/// Dialogs on the terminal: alerts go to stderr, confirmations read a line
/// from stdin unless pre-answered.
#[derive(Debug, Clone, Default)]
pub struct TerminalDialogs {
    assume_yes: bool,
}

impl TerminalDialogs {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Dialogs for TerminalDialogs {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{message} [y/N] ");
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        parse_answer(&answer)
    }
}

fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Runs tasks on the current `LocalSet`; tasks still pending when the set
/// is dropped never run.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTaskScheduler;

impl Scheduler for LocalTaskScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}
