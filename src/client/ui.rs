//! User-facing capabilities injected into the admin actions

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// What an action needs from whoever is driving it
pub trait Ui: Send + Sync {
    /// Ask the user to approve a mutation; `false` aborts it
    fn confirm(&self, prompt: &str) -> bool;

    /// Show a message and wait for it to be acknowledged
    fn notify(&self, message: &str);

    /// Ask for the presented state to be refreshed from the backend
    fn reload(&self);
}

/// Terminal front end for the `client` binary
pub struct TerminalUi {
    assume_yes: bool,
    reload_requested: AtomicBool,
}

impl TerminalUi {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            reload_requested: AtomicBool::new(false),
        }
    }

    /// Returns whether a reload was requested since the last call
    pub fn take_reload(&self) -> bool {
        self.reload_requested.swap(false, Ordering::SeqCst)
    }
}

impl Ui for TerminalUi {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            println!("{} [y/N] y", prompt);
            return true;
        }

        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::error!("Failed to read confirmation: {}", e);
                false
            }
        }
    }

    fn notify(&self, message: &str) {
        println!("{}", message);
    }

    fn reload(&self) {
        self.reload_requested.store(true, Ordering::SeqCst);
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
