//! Installation strategies.
//!
//! Each managed tool declares an ordered list of candidate strategies. The
//! installer tries them in order; whether a failed attempt falls through to
//! the next candidate is an explicit per-strategy declaration, never
//! inferred.

use std::collections::HashMap;

use crate::detection::package_manager::PackageManager;

/// Build an owned argv from string literals.
pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// A command plus its elevation requirement.
#[derive(Debug, Clone)]
pub struct ElevatedCommand {
    pub argv: Vec<String>,
    pub elevate: bool,
}

impl ElevatedCommand {
    pub fn plain(parts: &[&str]) -> Self {
        Self {
            argv: argv(parts),
            elevate: false,
        }
    }

    pub fn elevated(parts: &[&str]) -> Self {
        Self {
            argv: argv(parts),
            elevate: true,
        }
    }
}

/// Download-and-compile recipe for a source install.
#[derive(Debug, Clone)]
pub struct SourceBuild {
    /// Source archive URL.
    pub url: String,
    /// Expected SHA-256 of the archive, verified when present.
    pub sha256: Option<String>,
    /// Directory the archive unpacks into, relative to the build root.
    pub unpacked_dir: String,
    /// Build commands, run unprivileged in the unpacked directory.
    pub build: Vec<Vec<String>>,
    /// Install commands, run in the unpacked directory.
    pub install: Vec<ElevatedCommand>,
}

/// One candidate mechanism for making a tool available on the host.
#[derive(Debug, Clone)]
pub enum InstallStrategy {
    /// Install through the host package manager, using the per-manager
    /// package name mapping.
    PackageManager {
        packages: HashMap<PackageManager, String>,
        fallback_on_failure: bool,
    },
    /// Download, compile and install from source.
    BuildFromSource {
        recipe: SourceBuild,
        fallback_on_failure: bool,
    },
    /// Tools whose licensing prevents automated distribution. Always fails
    /// with the fixed message.
    ManualOnly { message: String },
}

impl InstallStrategy {
    /// Whether a failed attempt of this strategy falls through to the next
    /// candidate.
    pub fn fallback_on_failure(&self) -> bool {
        match self {
            InstallStrategy::PackageManager {
                fallback_on_failure,
                ..
            }
            | InstallStrategy::BuildFromSource {
                fallback_on_failure,
                ..
            } => *fallback_on_failure,
            InstallStrategy::ManualOnly { .. } => false,
        }
    }

    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            InstallStrategy::PackageManager { .. } => "package manager",
            InstallStrategy::BuildFromSource { .. } => "build from source",
            InstallStrategy::ManualOnly { .. } => "manual",
        }
    }
}

/// Convenience constructor for package-manager mappings.
pub fn package_map(entries: &[(PackageManager, &str)]) -> HashMap<PackageManager, String> {
    entries
        .iter()
        .map(|(pm, pkg)| (*pm, pkg.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_only_never_falls_through() {
        let strategy = InstallStrategy::ManualOnly {
            message: "site login required".into(),
        };
        assert!(!strategy.fallback_on_failure());
    }

    #[test]
    fn fallback_flag_is_explicit() {
        let falls = InstallStrategy::PackageManager {
            packages: package_map(&[(PackageManager::Apt, "qemu-utils")]),
            fallback_on_failure: true,
        };
        let aborts = InstallStrategy::BuildFromSource {
            recipe: SourceBuild {
                url: "http://example.com/src.tar.gz".into(),
                sha256: None,
                unpacked_dir: "src".into(),
                build: vec![argv(&["make"])],
                install: vec![ElevatedCommand::elevated(&["make", "install"])],
            },
            fallback_on_failure: false,
        };
        assert!(falls.fallback_on_failure());
        assert!(!aborts.fallback_on_failure());
    }

    #[test]
    fn package_map_keys_by_manager() {
        let map = package_map(&[
            (PackageManager::Apt, "zlib1g-dev"),
            (PackageManager::Dnf, "zlib-devel"),
        ]);
        assert_eq!(map.get(&PackageManager::Apt).unwrap(), "zlib1g-dev");
        assert_eq!(map.get(&PackageManager::Dnf).unwrap(), "zlib-devel");
        assert!(!map.contains_key(&PackageManager::Homebrew));
    }

    #[test]
    fn labels_name_the_mechanism() {
        let manual = InstallStrategy::ManualOnly {
            message: "n/a".into(),
        };
        assert_eq!(manual.label(), "manual");
    }

    #[test]
    fn elevated_command_constructors() {
        assert!(!ElevatedCommand::plain(&["make"]).elevate);
        assert!(ElevatedCommand::elevated(&["make", "install"]).elevate);
    }
}
