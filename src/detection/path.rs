//! Executable search-path probing.
//!
//! Helpers are located by iterating the process search path directly rather
//! than shelling out to `which` — `which` behavior varies across systems and
//! is sometimes a shell builtin with inconsistent error handling.

use std::path::{Path, PathBuf};

/// Parse the current process `PATH` into its entries.
pub fn parse_search_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|raw| std::env::split_paths(&raw).collect())
        .unwrap_or_default()
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a command's binary path by iterating over search-path entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(command: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(command);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}
