//! The `install-helpers` command.
//!
//! Orchestrator boundary: wires the registry, detector, and installer
//! together, renders the report, and converts the aggregate outcome into
//! the process exit decision. Per-helper failures never escape as errors;
//! only the final terminating failure does.

use crate::cli::args::InstallHelpersArgs;
use crate::cli::commands::{Command, CommandResult};
use crate::detection::package_manager::PackageManager;
use crate::error::Result;
use crate::executor::PrivilegedExecutor;
use crate::helpers::{Detector, HelperInstaller, Orchestrator, ToolRegistry};
use crate::ui::UserInterface;

/// Verify all helper tools and install any that are missing.
pub struct InstallHelpersCommand {
    args: InstallHelpersArgs,
}

impl InstallHelpersCommand {
    pub fn new(args: InstallHelpersArgs) -> Self {
        Self { args }
    }
}

/// Convert the aggregate outcome into the process exit decision.
fn exit_decision(overall_success: bool, ignore_errors: bool) -> CommandResult {
    if overall_success || ignore_errors {
        CommandResult::success()
    } else {
        CommandResult::failure(1)
    }
}

impl Command for InstallHelpersCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry = ToolRegistry::builtin();
        let detector = Detector::from_environment();
        let executor = PrivilegedExecutor::new();

        // Probing package managers runs their executables; skip it when no
        // install can happen anyway.
        let package_manager = if self.args.verify_only {
            None
        } else {
            let detected = PackageManager::detect();
            match detected {
                Some(pm) => tracing::debug!("Detected package manager: {}", pm.name()),
                None => tracing::debug!("No supported package manager detected"),
            }
            detected
        };

        let installer = HelperInstaller::new(&executor, package_manager);
        let orchestrator = Orchestrator::new(&registry, detector, installer);

        let report = orchestrator.run(self.args.verify_only, ui)?;
        // message() appends the final newline of the trailing blank line.
        let rendered = report.render(ui.terminal_width());
        ui.message(rendered.strip_suffix('\n').unwrap_or(&rendered));

        let result = exit_decision(report.overall_success(), self.args.ignore_errors);
        if !result.success {
            ui.error("Unable to install some helpers");
        }
        Ok(result)
    }
}
