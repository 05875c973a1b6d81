//! Mock UI implementation for testing.
//!
//! Captures everything written through the [`UserInterface`] capability so
//! tests can assert on messages without a terminal.

use super::spinner::NullSpinner;
use super::{OutputMode, SpinnerHandle, UserInterface};

/// Capturing UI for tests.
#[derive(Debug, Default)]
pub struct MockUI {
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    spinners: Vec<String>,
    width: usize,
}

impl MockUI {
    pub fn new() -> Self {
        Self {
            width: 80,
            ..Self::default()
        }
    }

    /// Fix the reported terminal width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn spinners_started(&self) -> &[String] {
        &self.spinners
    }

    pub fn has_message(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }

    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(needle))
    }

    pub fn has_error(&self, needle: &str) -> bool {
        self.errors.iter().any(|m| m.contains(needle))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        OutputMode::Normal
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(NullSpinner)
    }

    fn terminal_width(&self) -> usize {
        self.width
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_all_channels() {
        let mut ui = MockUI::new();
        ui.message("plain");
        ui.success("worked");
        ui.warning("careful");
        ui.error("broken");
        let _ = ui.start_spinner("spinning");

        assert!(ui.has_message("plain"));
        assert!(ui.has_warning("careful"));
        assert!(ui.has_error("broken"));
        assert_eq!(ui.spinners_started(), &["spinning".to_string()]);
    }

    #[test]
    fn width_is_configurable() {
        let ui = MockUI::new().with_width(40);
        assert_eq!(ui.terminal_width(), 40);
    }
}
