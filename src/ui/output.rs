//! Output mode.

/// How much status output to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Errors and the final report only.
    Quiet,
    /// Default output.
    Normal,
    /// Everything, including per-step detail.
    Verbose,
}

impl OutputMode {
    /// Whether status messages are shown.
    pub fn shows_status(&self) -> bool {
        !matches!(self, OutputMode::Quiet)
    }

    /// Whether spinners are shown.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, OutputMode::Normal | OutputMode::Verbose)
    }
}
