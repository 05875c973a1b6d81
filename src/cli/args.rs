//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};

/// vappkit - Helper tool manager for virtual appliance packaging.
#[derive(Debug, Parser)]
#[command(name = "vappkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install third-party helper programs the packaging tool may require
    ///
    /// * qemu-img (http://www.qemu.org/)
    /// * mkisofs  (http://cdrecord.org/)
    /// * ovftool  (https://www.vmware.com/support/developer/ovf/)
    /// * fatdisk  (http://github.com/goblinhack/fatdisk)
    /// * vmdktool (http://www.freshports.org/sysutils/vmdktool/)
    InstallHelpers(InstallHelpersArgs),
}

/// Arguments for the `install-helpers` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallHelpersArgs {
    /// Only verify helpers -- do not attempt to install any missing helpers
    #[arg(long)]
    pub verify_only: bool,

    /// Do not fail even if helper installation fails
    #[arg(short = 'i', long, conflicts_with = "verify_only")]
    pub ignore_errors: bool,
}
