//! vappkit - Helper tool manager for virtual appliance packaging.
//!
//! vappkit detects, verifies, and installs the external command-line
//! utilities a virtual-appliance packaging workflow depends on for
//! disk-image and ISO manipulation (`qemu-img`, `mkisofs`, `vmdktool`,
//! `fatdisk`, `ovftool`).
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`detection`] - Host probing: search path and package managers
//! - [`error`] - Error types and result aliases
//! - [`executor`] - External command execution, with optional elevation
//! - [`helpers`] - Tool descriptors, detection, resolution, installation
//! - [`report`] - Per-run installation report
//! - [`ui`] - Terminal output and the injectable UI capability
//!
//! # Example
//!
//! ```
//! use vappkit::helpers::{Detector, ToolRegistry};
//!
//! // Read-only verification of one built-in helper
//! let registry = ToolRegistry::builtin();
//! let detector = Detector::from_environment();
//! let spec = registry.get("qemu-img").unwrap();
//! let state = detector.detect(&spec.descriptor);
//! println!("qemu-img satisfied: {}", state.is_satisfied());
//! ```

pub mod cli;
pub mod detection;
pub mod error;
pub mod executor;
pub mod helpers;
pub mod report;
pub mod ui;

pub use error::{Result, VappkitError};
