//! Helper tool lifecycle management.
//!
//! Detects, verifies, and installs the external command-line utilities the
//! packaging tool depends on for disk-image and ISO manipulation.
//!
//! # Modules
//!
//! - [`descriptor`] - Static tool definitions (probe, version floor, prerequisites)
//! - [`detector`] - Read-only presence and version probing
//! - [`resolver`] - Prerequisite closure resolution
//! - [`strategy`] - Install strategy variants
//! - [`installer`] - Strategy search driver
//! - [`registry`] - The built-in managed tool set
//! - [`orchestrator`] - Top-level verify/install driver
//! - [`state`] - Per-run tool state machine
//! - [`version`] - Version parsing and ordering

pub mod descriptor;
pub mod detector;
pub mod installer;
pub mod orchestrator;
pub mod registry;
pub mod resolver;
pub mod state;
pub mod strategy;
pub mod version;

pub use descriptor::{PresenceProbe, ToolDescriptor, VersionQuery};
pub use detector::Detector;
pub use installer::{HelperInstaller, InstallOutcome};
pub use orchestrator::Orchestrator;
pub use registry::{ToolRegistry, ToolSpec};
pub use state::{ToolState, ToolStatus};
pub use version::Version;
