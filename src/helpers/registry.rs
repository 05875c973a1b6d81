//! The managed tool set.
//!
//! Holds the static definition of every helper vappkit manages, plus the
//! prerequisite-only library entries they depend on. Defined once at
//! startup, validated for broken references and cycles before any
//! installation command runs.

use std::collections::{BTreeMap, HashMap};

use crate::detection::package_manager::PackageManager;
use crate::error::{Result, VappkitError};
use crate::helpers::descriptor::{ToolDescriptor, VersionQuery};
use crate::helpers::strategy::{
    argv, package_map, ElevatedCommand, InstallStrategy, SourceBuild,
};
use crate::helpers::version::Version;

/// A descriptor together with its ordered install strategy candidates.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub descriptor: ToolDescriptor,
    pub strategies: Vec<InstallStrategy>,
}

/// Registry of all known tools and prerequisite libraries.
///
/// Managed entries appear in the installation report; prerequisite-only
/// entries (libraries) are installed when needed but reported only in logs.
pub struct ToolRegistry {
    specs: BTreeMap<String, ToolSpec>,
    managed: Vec<String>,
}

impl ToolRegistry {
    /// An empty registry (used by tests to build custom tool sets).
    pub fn empty() -> Self {
        Self {
            specs: BTreeMap::new(),
            managed: Vec::new(),
        }
    }

    /// Add a tool that appears in the installation report.
    pub fn insert_managed(&mut self, spec: ToolSpec) {
        self.managed.push(spec.descriptor.name.clone());
        self.specs.insert(spec.descriptor.name.clone(), spec);
    }

    /// Add a prerequisite-only entry (installed on demand, not reported).
    pub fn insert_prerequisite(&mut self, spec: ToolSpec) {
        self.specs.insert(spec.descriptor.name.clone(), spec);
    }

    /// Look up any entry, managed or prerequisite-only.
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.specs.get(name)
    }

    /// Managed specs sorted by name, the report and iteration order.
    pub fn managed_specs(&self) -> Vec<&ToolSpec> {
        let mut names: Vec<&String> = self.managed.iter().collect();
        names.sort();
        names
            .into_iter()
            .filter_map(|name| self.specs.get(name))
            .collect()
    }

    /// Validate the static definition: every prerequisite must exist and
    /// the prerequisite graph must be acyclic.
    ///
    /// A violation is a defect in the tool-set definition, surfaced
    /// immediately rather than per-tool.
    pub fn validate(&self) -> Result<()> {
        for spec in self.specs.values() {
            for prereq in &spec.descriptor.prerequisites {
                if !self.specs.contains_key(prereq) {
                    return Err(VappkitError::InvalidConfiguration {
                        message: format!(
                            "'{}' names unknown prerequisite '{}'",
                            spec.descriptor.name, prereq
                        ),
                    });
                }
            }
        }

        if let Some(cycle) = self.find_cycle() {
            return Err(VappkitError::CircularDependency {
                cycle: cycle.join(" -> "),
            });
        }
        Ok(())
    }

    /// Find a prerequisite cycle, returning the path if one exists.
    fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Visiting,
            Visited,
        }

        let mut state: HashMap<&str, State> = self
            .specs
            .keys()
            .map(|name| (name.as_str(), State::Unvisited))
            .collect();
        let mut path: Vec<String> = Vec::new();

        fn dfs<'a>(
            node: &'a str,
            registry: &'a ToolRegistry,
            state: &mut HashMap<&'a str, State>,
            path: &mut Vec<String>,
        ) -> Option<Vec<String>> {
            state.insert(node, State::Visiting);
            path.push(node.to_string());

            if let Some(spec) = registry.specs.get(node) {
                for prereq in &spec.descriptor.prerequisites {
                    match state.get(prereq.as_str()) {
                        Some(State::Visiting) => {
                            let start = path.iter().position(|n| n == prereq).unwrap_or(0);
                            let mut cycle: Vec<String> = path[start..].to_vec();
                            cycle.push(prereq.clone());
                            return Some(cycle);
                        }
                        Some(State::Unvisited) => {
                            if let Some(spec) = registry.specs.get(prereq.as_str()) {
                                let name = spec.descriptor.name.as_str();
                                if let Some(cycle) = dfs(name, registry, state, path) {
                                    return Some(cycle);
                                }
                            }
                        }
                        Some(State::Visited) | None => {}
                    }
                }
            }

            path.pop();
            state.insert(node, State::Visited);
            None
        }

        let names: Vec<&str> = self.specs.keys().map(String::as_str).collect();
        for name in names {
            if state.get(name) == Some(&State::Unvisited) {
                if let Some(cycle) = dfs(name, self, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    /// The built-in tool set: the five helpers the packaging tool depends
    /// on, plus the libraries they need to build.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        registry.insert_managed(ToolSpec {
            descriptor: ToolDescriptor::command(
                "fatdisk",
                "fatdisk",
                VersionQuery::new(&["--version"], r"(\d+(?:\.\d+)+)"),
            ),
            strategies: vec![InstallStrategy::BuildFromSource {
                recipe: SourceBuild {
                    url: "https://github.com/goblinhack/fatdisk/archive/refs/heads/master.tar.gz"
                        .into(),
                    sha256: None,
                    unpacked_dir: "fatdisk-master".into(),
                    build: vec![argv(&["./RUNME"])],
                    install: vec![ElevatedCommand::elevated(&[
                        "cp",
                        "fatdisk",
                        "/usr/local/bin/fatdisk",
                    ])],
                },
                fallback_on_failure: false,
            }],
        });

        registry.insert_managed(ToolSpec {
            descriptor: ToolDescriptor::command(
                "mkisofs",
                "mkisofs",
                VersionQuery::new(&["--version"], r"(\d+(?:\.\d+)+)"),
            ),
            strategies: vec![InstallStrategy::PackageManager {
                // apt's genisoimage provides the mkisofs interface;
                // re-verification searches for the command name either way.
                packages: package_map(&[
                    (PackageManager::Apt, "genisoimage"),
                    (PackageManager::Dnf, "genisoimage"),
                    (PackageManager::Yum, "genisoimage"),
                    (PackageManager::Pacman, "cdrtools"),
                    (PackageManager::Homebrew, "cdrtools"),
                    (PackageManager::MacPorts, "cdrtools"),
                ]),
                fallback_on_failure: true,
            }],
        });

        registry.insert_managed(ToolSpec {
            descriptor: ToolDescriptor::command(
                "ovftool",
                "ovftool",
                VersionQuery::new(&["--version"], r"(\d+(?:\.\d+)+)"),
            ),
            strategies: vec![InstallStrategy::ManualOnly {
                message: "No support for automated installation of ovftool, \
                          as VMware requires a site login to download it. See \
                          https://www.vmware.com/support/developer/ovf/"
                    .into(),
            }],
        });

        registry.insert_managed(ToolSpec {
            descriptor: ToolDescriptor::command(
                "qemu-img",
                "qemu-img",
                VersionQuery::new(&["--version"], r"qemu-img version (\d+(?:\.\d+)+)"),
            )
            // 2.1 added streamOptimized VMDK output, which the packaging
            // tool relies on.
            .with_minimum_version(Version::parse("2.1.0").expect("static version")),
            strategies: vec![InstallStrategy::PackageManager {
                packages: package_map(&[
                    (PackageManager::Apt, "qemu-utils"),
                    (PackageManager::Dnf, "qemu-img"),
                    (PackageManager::Yum, "qemu-img"),
                    (PackageManager::Pacman, "qemu-img"),
                    (PackageManager::Homebrew, "qemu"),
                    (PackageManager::MacPorts, "qemu"),
                ]),
                fallback_on_failure: true,
            }],
        });

        registry.insert_managed(ToolSpec {
            descriptor: ToolDescriptor::command(
                "vmdktool",
                "vmdktool",
                VersionQuery::new(&["-V"], r"vmdktool version (\d+(?:\.\d+)+)"),
            )
            .with_prerequisites(&["zlib"]),
            strategies: vec![InstallStrategy::BuildFromSource {
                recipe: SourceBuild {
                    url: "http://people.freebsd.org/~brian/vmdktool/vmdktool-1.4.tar.gz".into(),
                    sha256: None,
                    unpacked_dir: "vmdktool-1.4".into(),
                    build: vec![argv(&["make", "CFLAGS=-D_GNU_SOURCE -g -O -pipe"])],
                    install: vec![
                        ElevatedCommand::elevated(&[
                            "mkdir",
                            "-p",
                            "--mode=755",
                            "/usr/local/man/man8",
                        ]),
                        ElevatedCommand::elevated(&["make", "install"]),
                    ],
                },
                fallback_on_failure: false,
            }],
        });

        registry.insert_prerequisite(ToolSpec {
            descriptor: ToolDescriptor::library(
                "zlib",
                &[
                    "/usr/include/zlib.h",
                    "/usr/local/include/zlib.h",
                    "/opt/local/include/zlib.h",
                ],
            ),
            strategies: vec![InstallStrategy::PackageManager {
                packages: package_map(&[
                    (PackageManager::Apt, "zlib1g-dev"),
                    (PackageManager::Dnf, "zlib-devel"),
                    (PackageManager::Yum, "zlib-devel"),
                    (PackageManager::Pacman, "zlib"),
                    (PackageManager::Homebrew, "zlib"),
                    (PackageManager::MacPorts, "zlib"),
                ]),
                fallback_on_failure: true,
            }],
        });

        registry
    }
}
