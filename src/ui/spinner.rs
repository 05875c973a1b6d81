//! Progress spinners.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::SpinnerHandle;

/// Spinner shown while a detection or install step is in flight.
pub struct ProgressSpinner {
    bar: ProgressBar,
}

impl ProgressSpinner {
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// A spinner that renders nothing (quiet mode).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_and_clear(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// No-op spinner for non-interactive and mock UIs.
#[derive(Debug, Default)]
pub struct NullSpinner;

impl SpinnerHandle for NullSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_and_clear(&mut self) {}
}
