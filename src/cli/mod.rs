//! Command-line interface for vappkit.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, InstallHelpersArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
