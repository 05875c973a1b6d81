//! Error types for vappkit operations.
//!
//! This module defines [`VappkitError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `VappkitError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `VappkitError::Other`) for unexpected errors
//! - Per-helper failures are converted into report entries at the orchestrator
//!   boundary; configuration errors (cycles, unknown prerequisites) propagate
//!   straight to the caller

use thiserror::Error;

/// Core error type for vappkit operations.
#[derive(Debug, Error)]
pub enum VappkitError {
    /// A helper's prerequisite is not available before its install is attempted.
    #[error("Prerequisite '{prerequisite}' of '{tool}' is not available: {detail}")]
    UnmetPrerequisite {
        tool: String,
        prerequisite: String,
        detail: String,
    },

    /// An external command exited nonzero (or could not be started).
    #[error("Command failed with exit code {code:?}: {command}")]
    ExecutionFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// No install strategy can run for this helper on this host.
    #[error("{reason}")]
    NoInstaller { tool: String, reason: String },

    /// Prerequisite cycle in the static tool set.
    #[error("Circular prerequisite chain: {cycle}")]
    CircularDependency { cycle: String },

    /// Broken static tool-set definition (e.g. unknown prerequisite name).
    #[error("Invalid tool set: {message}")]
    InvalidConfiguration { message: String },

    /// Source archive download failed.
    #[error("Download of {url} failed: {message}")]
    DownloadFailed { url: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for vappkit operations.
pub type Result<T> = std::result::Result<T, VappkitError>;
