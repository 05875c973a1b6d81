//! Host package manager detection.

use std::process::{Command, Stdio};

/// A host package manager vappkit knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
    Pacman,
    Homebrew,
    MacPorts,
}

impl PackageManager {
    /// Human-readable name, also the executable probed for.
    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Pacman => "pacman",
            PackageManager::Homebrew => "brew",
            PackageManager::MacPorts => "port",
        }
    }

    /// Argv for installing a package non-interactively.
    pub fn install_argv(&self, package: &str) -> Vec<String> {
        let argv: Vec<&str> = match self {
            PackageManager::Apt => vec!["apt-get", "-q", "install", "-y", package],
            PackageManager::Dnf => vec!["dnf", "--quiet", "--assumeyes", "install", package],
            PackageManager::Yum => vec!["yum", "--quiet", "--assumeyes", "install", package],
            PackageManager::Pacman => vec!["pacman", "-S", "--noconfirm", package],
            PackageManager::Homebrew => vec!["brew", "install", package],
            PackageManager::MacPorts => vec!["port", "install", package],
        };
        argv.into_iter().map(String::from).collect()
    }

    /// Whether installs through this manager need elevated privileges.
    ///
    /// Homebrew refuses to run as root.
    pub fn needs_elevation(&self) -> bool {
        !matches!(self, PackageManager::Homebrew)
    }

    /// Managers to probe for on the current platform, in preference order.
    fn candidates() -> &'static [PackageManager] {
        #[cfg(target_os = "macos")]
        {
            &[PackageManager::Homebrew, PackageManager::MacPorts]
        }
        #[cfg(target_os = "linux")]
        {
            &[
                PackageManager::Apt,
                PackageManager::Dnf,
                PackageManager::Yum,
                PackageManager::Pacman,
                PackageManager::Homebrew,
            ]
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            &[]
        }
    }

    /// Detect the host's package manager by probing for its executable.
    pub fn detect() -> Option<PackageManager> {
        Self::candidates()
            .iter()
            .copied()
            .find(|pm| command_succeeds(pm.name(), &["--version"]))
    }
}

/// Run a command with output discarded, checking only for exit 0.
fn command_succeeds(command: &str, args: &[&str]) -> bool {
    Command::new(command)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}
