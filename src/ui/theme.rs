//! Visual theme and styling.

use console::Style;

/// Whether colored output should be used.
pub fn should_use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Styles applied to terminal output.
pub struct VappkitTheme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub dim: Style,
}

impl VappkitTheme {
    /// The colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
        }
    }

    /// A style-free theme for NO_COLOR and non-terminal output.
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(msg))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(msg))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(msg))
    }
}

impl Default for VappkitTheme {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_leaves_text_untouched() {
        let theme = VappkitTheme::plain();
        assert_eq!(theme.format_success("ok"), "ok");
        assert_eq!(theme.format_warning("careful"), "careful");
        assert_eq!(theme.format_error("bad"), "bad");
    }

    #[test]
    fn themes_construct() {
        let _ = VappkitTheme::new();
        let _ = VappkitTheme::default();
    }
}
