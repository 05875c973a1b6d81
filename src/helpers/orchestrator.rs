//! Top-level verify/install driver.
//!
//! Processes the managed tool set sequentially: detect, optionally install
//! (prerequisites first), re-verify, and record one outcome per tool.
//! Installation commands frequently hold the host package-manager lock and
//! raise privilege prompts, so nothing here runs concurrently; sequential
//! processing also keeps interleaved compile output legible.
//!
//! Per-tool failures become report entries and never abort the remaining
//! tools. Configuration errors (prerequisite cycles, unknown names)
//! propagate immediately instead.

use std::collections::{BTreeMap, HashSet};

use crate::error::{Result, VappkitError};
use crate::helpers::detector::Detector;
use crate::helpers::installer::{HelperInstaller, InstallOutcome};
use crate::helpers::registry::{ToolRegistry, ToolSpec};
use crate::helpers::resolver::resolve_install_order;
use crate::helpers::state::{ToolState, ToolStatus};
use crate::report::{InstallationReport, Outcome};
use crate::ui::UserInterface;

/// Drives the managed tool set through one verify or install run.
pub struct Orchestrator<'a> {
    registry: &'a ToolRegistry,
    detector: Detector,
    installer: HelperInstaller<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        registry: &'a ToolRegistry,
        detector: Detector,
        installer: HelperInstaller<'a>,
    ) -> Self {
        Self {
            registry,
            detector,
            installer,
        }
    }

    /// Process every managed tool and aggregate the outcomes.
    ///
    /// With `verify_only` no installation is ever attempted; missing tools
    /// are reported `NOT FOUND`. Otherwise missing tools are installed
    /// (prerequisite closure first) and re-verified.
    pub fn run(&self, verify_only: bool, ui: &mut dyn UserInterface) -> Result<InstallationReport> {
        // A broken static definition fails the whole run up front, before
        // any installation command.
        self.registry.validate()?;

        let mut states: BTreeMap<String, ToolState> = BTreeMap::new();

        for spec in self.registry.managed_specs() {
            let name = spec.descriptor.name.clone();
            let mut spinner = ui.start_spinner(&format!("Checking {}...", name));
            let detected = self.detector.detect(&spec.descriptor);
            spinner.finish_and_clear();

            if detected.is_satisfied() {
                tracing::debug!(
                    "'{}' present at {:?}, version {:?}",
                    name,
                    detected.resolved_path,
                    detected.resolved_version
                );
                states.insert(name, detected);
                continue;
            }
            if verify_only {
                states.insert(name, detected);
                continue;
            }

            let final_state = self.install_with_prerequisites(spec, &mut states, ui)?;
            states.insert(name, final_state);
        }

        let mut report = InstallationReport::new();
        for spec in self.registry.managed_specs() {
            let name = &spec.descriptor.name;
            let state = states
                .get(name)
                .cloned()
                .unwrap_or_else(ToolState::not_checked);
            report.record(name, Outcome::from_state(&state));
        }
        Ok(report)
    }

    /// Install a missing tool, its unsatisfied prerequisites first.
    ///
    /// A prerequisite failure terminates this tool's installation (the
    /// returned state names the failed prerequisite) without touching
    /// sibling tools.
    fn install_with_prerequisites(
        &self,
        spec: &ToolSpec,
        states: &mut BTreeMap<String, ToolState>,
        ui: &mut dyn UserInterface,
    ) -> Result<ToolState> {
        let satisfied: HashSet<String> = states
            .iter()
            .filter(|(_, state)| state.is_satisfied())
            .map(|(name, _)| name.clone())
            .collect();

        let order = resolve_install_order(self.registry, &spec.descriptor, &satisfied)?;

        for dep_name in &order {
            if dep_name == &spec.descriptor.name {
                continue;
            }
            let Some(dep_spec) = self.registry.get(dep_name) else {
                return Err(VappkitError::InvalidConfiguration {
                    message: format!("unknown tool '{}' in install order", dep_name),
                });
            };

            // Present-but-unchecked prerequisites are satisfied as-is.
            let current = self.detector.detect(&dep_spec.descriptor);
            if current.is_satisfied() {
                states.insert(dep_name.clone(), current);
                continue;
            }

            ui.message(&format!(
                "'{}' requires '{}'... installing '{}'",
                spec.descriptor.name, dep_name, dep_name
            ));
            states.insert(dep_name.clone(), ToolState::installing());
            let state = self.install_one(dep_spec, states, ui);
            let ok = state.is_satisfied();
            states.insert(dep_name.clone(), state);
            if !ok {
                return Ok(ToolState::install_failed(format!(
                    "prerequisite '{}' could not be installed",
                    dep_name
                )));
            }
        }

        states.insert(spec.descriptor.name.clone(), ToolState::installing());
        Ok(self.install_one(spec, states, ui))
    }

    /// Run the strategy search for one tool, then re-verify with the
    /// detector to confirm and pick up the installed path and version.
    fn install_one(
        &self,
        spec: &ToolSpec,
        states: &BTreeMap<String, ToolState>,
        ui: &mut dyn UserInterface,
    ) -> ToolState {
        match self.installer.install(spec, states, ui) {
            InstallOutcome::Completed => {
                let verified = self.detector.detect(&spec.descriptor);
                match (verified.status, verified.resolved_path) {
                    (ToolStatus::Found, Some(path)) => {
                        ToolState::installed(path, verified.resolved_version)
                    }
                    _ => ToolState::install_failed(format!(
                        "install commands completed but '{}' was still not found afterwards",
                        spec.descriptor.name
                    )),
                }
            }
            InstallOutcome::Failed(detail) => ToolState::install_failed(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::package_manager::PackageManager;
    use crate::error::Result as VappkitResult;
    use crate::executor::testing::ScriptedRunner;
    use crate::executor::{CommandRunner, ExecOutput};
    use crate::helpers::descriptor::{ToolDescriptor, VersionQuery};
    use crate::helpers::strategy::{package_map, InstallStrategy};
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Runner that simulates a real install by dropping an executable
    /// (named after the package) into a bin directory.
    struct InstallingRunner {
        bin_dir: PathBuf,
        fail_matching: Option<String>,
        calls: RefCell<Vec<String>>,
    }

    impl InstallingRunner {
        fn new(bin_dir: &Path) -> Self {
            Self {
                bin_dir: bin_dir.to_path_buf(),
                fail_matching: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing_on(bin_dir: &Path, pattern: &str) -> Self {
            Self {
                fail_matching: Some(pattern.to_string()),
                ..Self::new(bin_dir)
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }

        fn installs_of(&self, package: &str) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|cmd| cmd.ends_with(package))
                .count()
        }
    }

    #[cfg(unix)]
    fn write_fake_tool(dir: &Path, name: &str, stdout: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\necho \"{}\"\n", stdout)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
    }

    impl CommandRunner for InstallingRunner {
        fn run(
            &self,
            argv: &[String],
            _elevate: bool,
            _cwd: Option<&Path>,
        ) -> VappkitResult<ExecOutput> {
            let rendered = argv.join(" ");
            self.calls.borrow_mut().push(rendered.clone());
            if let Some(pattern) = &self.fail_matching {
                if rendered.contains(pattern.as_str()) {
                    return Err(crate::error::VappkitError::ExecutionFailed {
                        command: rendered,
                        code: Some(100),
                        output: "E: unable to locate package\n".into(),
                    });
                }
            }
            #[cfg(unix)]
            if let Some(package) = argv.last() {
                write_fake_tool(&self.bin_dir, package, &format!("{} version 1.0.0", package));
            }
            Ok(ExecOutput {
                exit_code: Some(0),
                output: String::new(),
            })
        }
    }

    /// Tool whose install maps its own name as the package, so the
    /// InstallingRunner makes it detectable afterwards.
    fn pm_tool(name: &str, prerequisites: &[&str]) -> ToolSpec {
        ToolSpec {
            descriptor: ToolDescriptor::command(name, name, VersionQuery::version_flag())
                .with_prerequisites(prerequisites),
            strategies: vec![InstallStrategy::PackageManager {
                packages: package_map(&[(PackageManager::Apt, name)]),
                fallback_on_failure: false,
            }],
        }
    }

    fn registry_of(managed: Vec<ToolSpec>, prereqs: Vec<ToolSpec>) -> ToolRegistry {
        let mut registry = ToolRegistry::empty();
        for spec in managed {
            registry.insert_managed(spec);
        }
        for spec in prereqs {
            registry.insert_prerequisite(spec);
        }
        registry
    }

    fn orchestrate<'a>(
        registry: &'a ToolRegistry,
        bin_dir: &Path,
        runner: &'a dyn CommandRunner,
    ) -> Orchestrator<'a> {
        let detector = Detector::with_path_entries(vec![bin_dir.to_path_buf()]);
        let installer = HelperInstaller::new(runner, Some(PackageManager::Apt));
        Orchestrator::new(registry, detector, installer)
    }

    #[cfg(unix)]
    #[test]
    fn present_tools_trigger_no_install() {
        let temp = TempDir::new().unwrap();
        write_fake_tool(temp.path(), "alpha", "alpha version 2.0.0");
        write_fake_tool(temp.path(), "beta", "beta version 3.0.0");

        let registry = registry_of(vec![pm_tool("alpha", &[]), pm_tool("beta", &[])], vec![]);
        let runner = ScriptedRunner::succeeding();
        let orchestrator = orchestrate(&registry, temp.path(), &runner);
        let mut ui = MockUI::new();

        let report = orchestrator.run(false, &mut ui).unwrap();

        assert!(report.overall_success());
        assert_eq!(runner.call_count(), 0, "install attempts must be zero");
        match report.get("alpha") {
            Some(Outcome::Found { version, .. }) => {
                assert_eq!(version.as_deref(), Some("2.0.0"));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn verify_only_reports_not_found_and_fails_overall() {
        let temp = TempDir::new().unwrap();
        let registry = registry_of(vec![pm_tool("ghost", &[])], vec![]);
        let runner = ScriptedRunner::succeeding();
        let orchestrator = orchestrate(&registry, temp.path(), &runner);
        let mut ui = MockUI::new();

        let report = orchestrator.run(true, &mut ui).unwrap();

        assert!(!report.overall_success());
        assert_eq!(report.get("ghost"), Some(&Outcome::NotFound));
        assert_eq!(runner.call_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn missing_tool_is_installed_and_reverified() {
        let temp = TempDir::new().unwrap();
        let registry = registry_of(vec![pm_tool("newtool", &[])], vec![]);
        let runner = InstallingRunner::new(temp.path());
        let orchestrator = orchestrate(&registry, temp.path(), &runner);
        let mut ui = MockUI::new();

        let report = orchestrator.run(false, &mut ui).unwrap();

        assert!(report.overall_success());
        match report.get("newtool") {
            Some(Outcome::Installed { path, version }) => {
                assert!(path.ends_with("newtool"));
                assert_eq!(version.as_deref(), Some("1.0.0"));
            }
            other => panic!("expected Installed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn partial_failure_reports_both_outcomes() {
        let temp = TempDir::new().unwrap();
        let registry = registry_of(
            vec![pm_tool("works", &[]), pm_tool("breaks", &[])],
            vec![],
        );
        let runner = InstallingRunner::failing_on(temp.path(), "breaks");
        let orchestrator = orchestrate(&registry, temp.path(), &runner);
        let mut ui = MockUI::new();

        let report = orchestrator.run(false, &mut ui).unwrap();

        assert!(!report.overall_success());
        assert!(matches!(report.get("works"), Some(Outcome::Installed { .. })));
        assert!(matches!(
            report.get("breaks"),
            Some(Outcome::InstallFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn prerequisites_install_before_dependents() {
        let temp = TempDir::new().unwrap();
        let registry = registry_of(
            vec![pm_tool("needy", &["libfoo"])],
            vec![pm_tool("libfoo", &[])],
        );
        let runner = InstallingRunner::new(temp.path());
        let orchestrator = orchestrate(&registry, temp.path(), &runner);
        let mut ui = MockUI::new();

        let report = orchestrator.run(false, &mut ui).unwrap();

        assert!(report.overall_success());
        let calls = runner.calls.borrow();
        let lib_idx = calls.iter().position(|c| c.ends_with("libfoo")).unwrap();
        let needy_idx = calls.iter().position(|c| c.ends_with("needy")).unwrap();
        assert!(lib_idx < needy_idx);
    }

    #[cfg(unix)]
    #[test]
    fn failed_prerequisite_fails_dependent_without_attempting_it() {
        let temp = TempDir::new().unwrap();
        let registry = registry_of(
            vec![pm_tool("needy", &["libbad"])],
            vec![pm_tool("libbad", &[])],
        );
        let runner = InstallingRunner::failing_on(temp.path(), "libbad");
        let orchestrator = orchestrate(&registry, temp.path(), &runner);
        let mut ui = MockUI::new();

        let report = orchestrator.run(false, &mut ui).unwrap();

        assert!(!report.overall_success());
        match report.get("needy") {
            Some(Outcome::InstallFailed { detail }) => {
                assert!(detail.contains("libbad"), "detail: {}", detail);
            }
            other => panic!("expected InstallFailed, got {:?}", other),
        }
        assert_eq!(runner.installs_of("needy"), 0);
    }

    #[cfg(unix)]
    #[test]
    fn shared_prerequisite_installs_once() {
        let temp = TempDir::new().unwrap();
        let registry = registry_of(
            vec![pm_tool("first", &["libshared"]), pm_tool("second", &["libshared"])],
            vec![pm_tool("libshared", &[])],
        );
        let runner = InstallingRunner::new(temp.path());
        let orchestrator = orchestrate(&registry, temp.path(), &runner);
        let mut ui = MockUI::new();

        let report = orchestrator.run(false, &mut ui).unwrap();

        assert!(report.overall_success());
        assert_eq!(runner.installs_of("libshared"), 1);
    }

    #[test]
    fn cycle_rejected_before_any_install_command() {
        let temp = TempDir::new().unwrap();
        let registry = registry_of(
            vec![pm_tool("x", &["y"])],
            vec![pm_tool("y", &["x"])],
        );
        let runner = ScriptedRunner::succeeding();
        let orchestrator = orchestrate(&registry, temp.path(), &runner);
        let mut ui = MockUI::new();

        let result = orchestrator.run(false, &mut ui);

        assert!(matches!(
            result,
            Err(VappkitError::CircularDependency { .. })
        ));
        assert_eq!(runner.call_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn repeated_runs_are_idempotent() {
        let temp = TempDir::new().unwrap();
        write_fake_tool(temp.path(), "steady", "steady version 4.2.0");
        let registry = registry_of(vec![pm_tool("steady", &[])], vec![]);
        let runner = ScriptedRunner::succeeding();
        let orchestrator = orchestrate(&registry, temp.path(), &runner);
        let mut ui = MockUI::new();

        let first = orchestrator.run(false, &mut ui).unwrap().render(80);
        let second = orchestrator.run(false, &mut ui).unwrap().render(80);

        assert_eq!(first, second);
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn manual_only_tool_fails_with_its_message() {
        let temp = TempDir::new().unwrap();
        let spec = ToolSpec {
            descriptor: ToolDescriptor::command(
                "vendor-tool",
                "vendor-tool",
                VersionQuery::version_flag(),
            ),
            strategies: vec![InstallStrategy::ManualOnly {
                message: "vendor requires a site login".into(),
            }],
        };
        let registry = registry_of(vec![spec], vec![]);
        let runner = ScriptedRunner::succeeding();
        let orchestrator = orchestrate(&registry, temp.path(), &runner);
        let mut ui = MockUI::new();

        let report = orchestrator.run(false, &mut ui).unwrap();

        match report.get("vendor-tool") {
            Some(Outcome::InstallFailed { detail }) => {
                assert_eq!(detail, "vendor requires a site login");
            }
            other => panic!("expected InstallFailed, got {:?}", other),
        }
        assert_eq!(runner.call_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn detection_shows_a_spinner_per_tool() {
        let temp = TempDir::new().unwrap();
        write_fake_tool(temp.path(), "alpha", "alpha version 1.0.0");
        let registry = registry_of(vec![pm_tool("alpha", &[])], vec![]);
        let runner = ScriptedRunner::succeeding();
        let orchestrator = orchestrate(&registry, temp.path(), &runner);
        let mut ui = MockUI::new();

        orchestrator.run(false, &mut ui).unwrap();

        assert_eq!(ui.spinners_started().len(), 1);
        assert!(ui.spinners_started()[0].contains("alpha"));
    }
}
