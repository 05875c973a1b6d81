//! Strategy-driven helper installation.
//!
//! Tries each of a tool's candidate strategies in declared order. A
//! strategy that cannot run on this host (no package manager, no package
//! mapping) always falls through to the next candidate; a strategy that
//! ran and failed falls through only when its `fallback_on_failure` flag
//! says so.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::detection::package_manager::PackageManager;
use crate::error::VappkitError;
use crate::executor::{download, CommandRunner};
use crate::helpers::registry::ToolSpec;
use crate::helpers::state::ToolState;
use crate::helpers::strategy::{InstallStrategy, SourceBuild};
use crate::ui::UserInterface;

/// Result of driving a tool's strategy list.
#[derive(Debug)]
pub enum InstallOutcome {
    /// A strategy ran to completion; the caller re-verifies with the
    /// detector to confirm and pick up the installed path and version.
    Completed,
    /// No strategy produced the tool; the detail is report-ready.
    Failed(String),
}

/// How a single strategy attempt went.
enum Attempt {
    Succeeded,
    /// Strategy cannot run on this host; always try the next one.
    NotApplicable(String),
    /// Strategy ran and failed.
    Failed(VappkitError),
}

/// Drives install strategies for missing helpers.
pub struct HelperInstaller<'a> {
    runner: &'a dyn CommandRunner,
    package_manager: Option<PackageManager>,
    build_root: PathBuf,
}

impl<'a> HelperInstaller<'a> {
    pub fn new(runner: &'a dyn CommandRunner, package_manager: Option<PackageManager>) -> Self {
        Self {
            runner,
            package_manager,
            build_root: std::env::temp_dir().join("vappkit-build"),
        }
    }

    /// Override the scratch area used for source builds (used by tests).
    pub fn with_build_root(mut self, build_root: PathBuf) -> Self {
        self.build_root = build_root;
        self
    }

    /// Attempt to install one tool, reporting progress through `ui`.
    ///
    /// Every prerequisite must already be satisfied in `states`; otherwise
    /// this fails fast without attempting any command.
    pub fn install(
        &self,
        spec: &ToolSpec,
        states: &BTreeMap<String, ToolState>,
        ui: &mut dyn UserInterface,
    ) -> InstallOutcome {
        let name = &spec.descriptor.name;

        for prereq in &spec.descriptor.prerequisites {
            let met = states.get(prereq).is_some_and(ToolState::is_satisfied);
            if !met {
                let err = VappkitError::UnmetPrerequisite {
                    tool: name.clone(),
                    prerequisite: prereq.clone(),
                    detail: "not present and not installed during this run".into(),
                };
                return InstallOutcome::Failed(err.to_string());
            }
        }

        ui.message(&format!("Installing '{}'...", name));

        let mut last_failure: Option<String> = None;
        for strategy in &spec.strategies {
            match self.attempt(spec, strategy) {
                Attempt::Succeeded => {
                    ui.success(&format!("Successfully installed '{}'", name));
                    return InstallOutcome::Completed;
                }
                Attempt::NotApplicable(reason) => {
                    tracing::debug!(
                        "Skipping {} install of '{}': {}",
                        strategy.label(),
                        name,
                        reason
                    );
                    if last_failure.is_none() {
                        last_failure = Some(reason);
                    }
                }
                Attempt::Failed(err) => {
                    let detail = failure_detail(&err);
                    if strategy.fallback_on_failure() {
                        ui.warning(&format!(
                            "{} install of '{}' failed, trying next strategy: {}",
                            strategy.label(),
                            name,
                            detail
                        ));
                        last_failure = Some(detail);
                    } else {
                        return InstallOutcome::Failed(detail);
                    }
                }
            }
        }

        InstallOutcome::Failed(last_failure.unwrap_or_else(|| {
            VappkitError::NoInstaller {
                tool: name.clone(),
                reason: format!("No install strategy available for '{}' on this platform", name),
            }
            .to_string()
        }))
    }

    fn attempt(&self, spec: &ToolSpec, strategy: &InstallStrategy) -> Attempt {
        match strategy {
            InstallStrategy::PackageManager { packages, .. } => {
                let Some(manager) = self.package_manager else {
                    return Attempt::NotApplicable(
                        "no supported package manager detected".into(),
                    );
                };
                let Some(package) = packages.get(&manager) else {
                    return Attempt::NotApplicable(format!(
                        "no {} package mapping for '{}'",
                        manager.name(),
                        spec.descriptor.name
                    ));
                };
                let argv = manager.install_argv(package);
                match self.runner.run(&argv, manager.needs_elevation(), None) {
                    Ok(_) => Attempt::Succeeded,
                    Err(err) => Attempt::Failed(err),
                }
            }
            InstallStrategy::BuildFromSource { recipe, .. } => {
                match self.build_from_source(&spec.descriptor.name, recipe) {
                    Ok(()) => Attempt::Succeeded,
                    Err(err) => Attempt::Failed(err),
                }
            }
            InstallStrategy::ManualOnly { message } => Attempt::Failed(VappkitError::NoInstaller {
                tool: spec.descriptor.name.clone(),
                reason: message.clone(),
            }),
        }
    }

    fn build_from_source(&self, name: &str, recipe: &SourceBuild) -> crate::error::Result<()> {
        let build_dir = self.build_root.join(name);
        let archive = download::fetch_archive(&recipe.url, &build_dir, recipe.sha256.as_deref())?;
        download::unpack_archive(&archive, &build_dir, self.runner)?;

        let src_dir = build_dir.join(&recipe.unpacked_dir);

        tracing::info!("Compiling '{}'", name);
        for command in &recipe.build {
            self.runner.run(command, false, Some(&src_dir))?;
        }

        tracing::info!("Compilation complete, installing now");
        for command in &recipe.install {
            self.runner.run(&command.argv, command.elevate, Some(&src_dir))?;
        }
        Ok(())
    }
}

/// Report-ready failure text, including a diagnostic tail of captured
/// output for command failures.
fn failure_detail(err: &VappkitError) -> String {
    match err {
        VappkitError::ExecutionFailed { output, .. } if !output.trim().is_empty() => {
            let tail: Vec<&str> = output.trim_end().lines().rev().take(3).collect();
            let tail: Vec<&str> = tail.into_iter().rev().collect();
            format!("{} ({})", err, tail.join(" / "))
        }
        other => other.to_string(),
    }
}
