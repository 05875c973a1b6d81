//! Per-run tool state.
//!
//! One [`ToolState`] exists per managed tool per orchestrator run, created
//! fresh on every run and discarded at the end; nothing persists.

use std::path::PathBuf;

/// Lifecycle position of a tool within one run.
///
/// `NotChecked → {Found, NotFound}`, then for a missing tool in install mode
/// `NotFound → Installing → {Installed, InstallFailed}`. `Found` and
/// `Installed` are terminal success; `NotFound` (verify-only) and
/// `InstallFailed` are terminal failure. There is no retry within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    NotChecked,
    Found,
    NotFound,
    Installing,
    Installed,
    InstallFailed,
}

/// Runtime state of one managed tool.
#[derive(Debug, Clone)]
pub struct ToolState {
    pub status: ToolStatus,
    /// Filesystem location; populated exactly when status is Found or Installed.
    pub resolved_path: Option<PathBuf>,
    /// Version string once known; `None` means unknown.
    pub resolved_version: Option<String>,
    /// Human-readable cause; populated only for InstallFailed.
    pub failure_detail: Option<String>,
}

impl ToolState {
    pub fn not_checked() -> Self {
        Self {
            status: ToolStatus::NotChecked,
            resolved_path: None,
            resolved_version: None,
            failure_detail: None,
        }
    }

    pub fn found(path: PathBuf, version: Option<String>) -> Self {
        Self {
            status: ToolStatus::Found,
            resolved_path: Some(path),
            resolved_version: version,
            failure_detail: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: ToolStatus::NotFound,
            resolved_path: None,
            resolved_version: None,
            failure_detail: None,
        }
    }

    pub fn installing() -> Self {
        Self {
            status: ToolStatus::Installing,
            resolved_path: None,
            resolved_version: None,
            failure_detail: None,
        }
    }

    pub fn installed(path: PathBuf, version: Option<String>) -> Self {
        Self {
            status: ToolStatus::Installed,
            resolved_path: Some(path),
            resolved_version: version,
            failure_detail: None,
        }
    }

    pub fn install_failed(detail: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::InstallFailed,
            resolved_path: None,
            resolved_version: None,
            failure_detail: Some(detail.into()),
        }
    }

    /// Whether the tool is usable (found or installed during this run).
    pub fn is_satisfied(&self) -> bool {
        matches!(self.status, ToolStatus::Found | ToolStatus::Installed)
    }

    /// Path is populated exactly for the satisfied statuses.
    pub fn invariant_holds(&self) -> bool {
        self.resolved_path.is_some() == self.is_satisfied()
            && (self.failure_detail.is_none() || self.status == ToolStatus::InstallFailed)
    }
}
