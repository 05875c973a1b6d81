//! Static definitions of managed helper tools.

use std::path::PathBuf;

use crate::helpers::version::Version;

/// How to ask a tool for its version string.
#[derive(Debug, Clone)]
pub struct VersionQuery {
    /// Arguments passed to the tool (e.g. `["--version"]`).
    pub args: Vec<String>,
    /// Capture pattern applied to combined stdout+stderr; group 1 is the version.
    pub pattern: String,
}

impl VersionQuery {
    /// A query with explicit arguments and capture pattern.
    pub fn new(args: &[&str], pattern: &str) -> Self {
        Self {
            args: args.iter().map(|s| s.to_string()).collect(),
            pattern: pattern.to_string(),
        }
    }

    /// The common case: `--version` with a dotted-numeric capture.
    pub fn version_flag() -> Self {
        Self::new(&["--version"], r"(\d+(?:\.\d+)+)")
    }
}

/// How presence of a managed item is established.
#[derive(Debug, Clone)]
pub enum PresenceProbe {
    /// Search the executable path for a command, then query its version.
    Command {
        command: String,
        version_query: VersionQuery,
    },
    /// Presence of any of the candidate files (development libraries).
    AnyFile { candidates: Vec<PathBuf> },
}

/// Static definition of one managed tool or prerequisite library.
///
/// Descriptors are defined once at startup and never mutated; all runtime
/// state lives in [`super::state::ToolState`].
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    /// Canonical identifier, unique across the managed set.
    pub name: String,
    /// How presence and version are established.
    pub probe: PresenceProbe,
    /// Version floor; `None` accepts any detected version.
    pub minimum_version: Option<Version>,
    /// Names that must be installed before this tool can be built or installed.
    pub prerequisites: Vec<String>,
}

impl ToolDescriptor {
    /// A tool located through the executable search path.
    pub fn command(name: &str, command: &str, version_query: VersionQuery) -> Self {
        Self {
            name: name.to_string(),
            probe: PresenceProbe::Command {
                command: command.to_string(),
                version_query,
            },
            minimum_version: None,
            prerequisites: Vec::new(),
        }
    }

    /// A library located through well-known header/file locations.
    pub fn library(name: &str, candidates: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            probe: PresenceProbe::AnyFile {
                candidates: candidates.iter().map(PathBuf::from).collect(),
            },
            minimum_version: None,
            prerequisites: Vec::new(),
        }
    }

    /// Require at least the given version.
    pub fn with_minimum_version(mut self, version: Version) -> Self {
        self.minimum_version = Some(version);
        self
    }

    /// Declare prerequisites, in install order preference.
    pub fn with_prerequisites(mut self, prerequisites: &[&str]) -> Self {
        self.prerequisites = prerequisites.iter().map(|s| s.to_string()).collect();
        self
    }
}
