//! Non-interactive UI for CI/headless environments.

use super::spinner::NullSpinner;
use super::{OutputMode, SpinnerHandle, UserInterface};

/// Fallback width when `COLUMNS` is unset or unparsable.
const DEFAULT_WIDTH: usize = 80;

/// Plain-stdout UI with no colors, spinners, or cursor control.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("WARNING: {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", msg);
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_status() {
            println!("{}", message);
        }
        Box::new(NullSpinner)
    }

    fn terminal_width(&self) -> usize {
        std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&w| w > 0)
            .unwrap_or(DEFAULT_WIDTH)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
