//! Read-only presence and version probing.
//!
//! The detector never mutates the environment and is safe to call
//! repeatedly; the orchestrator uses it both for the initial check and for
//! post-install re-verification.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::detection::path::{parse_search_path, resolve_tool_path};
use crate::helpers::descriptor::{PresenceProbe, ToolDescriptor, VersionQuery};
use crate::helpers::state::ToolState;
use crate::helpers::version::Version;

/// Locates installed tools and extracts their versions.
pub struct Detector {
    path_entries: Vec<PathBuf>,
}

impl Detector {
    /// A detector searching the process `PATH`.
    pub fn from_environment() -> Self {
        Self::with_path_entries(parse_search_path())
    }

    /// A detector with explicit search-path entries (used by tests).
    pub fn with_path_entries(path_entries: Vec<PathBuf>) -> Self {
        Self { path_entries }
    }

    /// Probe for a tool, returning `Found` (with path and best-effort
    /// version) or `NotFound`.
    ///
    /// Presence takes precedence over parseability: a tool whose version
    /// query fails or produces no match is still `Found`, with an unknown
    /// version. A parsed version below the descriptor's floor is treated
    /// as `NotFound` so that install mode attempts an upgrade.
    pub fn detect(&self, descriptor: &ToolDescriptor) -> ToolState {
        match &descriptor.probe {
            PresenceProbe::Command {
                command,
                version_query,
            } => {
                let Some(path) = resolve_tool_path(command, &self.path_entries) else {
                    return ToolState::not_found();
                };
                let version = query_version(&path, version_query);
                if let (Some(floor), Some(raw)) = (&descriptor.minimum_version, &version) {
                    if let Some(detected) = Version::parse(raw) {
                        if detected < *floor {
                            tracing::warn!(
                                "'{}' version {} at {} is below the required minimum {}",
                                descriptor.name,
                                detected,
                                path.display(),
                                floor
                            );
                            return ToolState::not_found();
                        }
                    }
                }
                ToolState::found(path, version)
            }
            PresenceProbe::AnyFile { candidates } => candidates
                .iter()
                .find(|candidate| candidate.is_file())
                .map(|candidate| ToolState::found(candidate.clone(), None))
                .unwrap_or_else(ToolState::not_found),
        }
    }
}

/// Invoke the tool's version query and extract the version string.
///
/// The exit status is deliberately ignored — several helpers print their
/// version to stderr or exit nonzero on `--version`.
fn query_version(path: &Path, query: &VersionQuery) -> Option<String> {
    let output = Command::new(path).args(&query.args).output().ok()?;
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    let re = regex::Regex::new(&query.pattern).ok()?;
    re.captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
