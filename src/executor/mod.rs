//! External command execution.
//!
//! All installation commands funnel through the [`CommandRunner`] trait so
//! that the installer and orchestrator can be exercised in tests with a
//! scripted runner. The production implementation,
//! [`PrivilegedExecutor`], echoes output line by line while it is captured,
//! so progress stays visible during long builds.

pub mod download;

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;

use crate::error::{Result, VappkitError};

/// Captured outcome of a completed command.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Exit code (`None` if killed by signal).
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr, in arrival order.
    pub output: String,
}

/// Capability for running external commands, optionally elevated.
pub trait CommandRunner {
    /// Run a command to completion, capturing combined output.
    ///
    /// Nonzero exit produces [`VappkitError::ExecutionFailed`] carrying the
    /// captured output; the caller decides whether that is fatal.
    fn run(&self, argv: &[String], elevate: bool, cwd: Option<&Path>) -> Result<ExecOutput>;
}

/// Render an argv for log lines and error messages.
pub fn render_argv(argv: &[String]) -> String {
    argv.join(" ")
}

#[cfg(unix)]
fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn is_root() -> bool {
    false
}

/// Runs commands as child processes, prefixing the platform's
/// privilege-escalation mechanism when elevation is requested.
///
/// There is no timeout: a hung build or an interactive `sudo` prompt blocks
/// until the user intervenes. stdin stays connected to the terminal so that
/// prompt remains answerable.
#[derive(Debug, Default)]
pub struct PrivilegedExecutor;

impl PrivilegedExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for PrivilegedExecutor {
    fn run(&self, argv: &[String], elevate: bool, cwd: Option<&Path>) -> Result<ExecOutput> {
        let Some((program, args)) = split_command(argv, elevate) else {
            return Err(VappkitError::InvalidConfiguration {
                message: "empty command".into(),
            });
        };

        let rendered = {
            let mut full = vec![program.clone()];
            full.extend(args.iter().cloned());
            render_argv(&full)
        };
        tracing::info!("Calling '{}'...", rendered);

        let mut cmd = Command::new(&program);
        cmd.args(&args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| VappkitError::ExecutionFailed {
            command: rendered.clone(),
            code: None,
            output: e.to_string(),
        })?;

        // Reader threads forward lines as they arrive; the receiving loop
        // echoes each line so progress stays visible while it is captured.
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (tx, rx) = mpsc::channel::<String>();
        let tx_err = tx.clone();

        let stdout_handle = stdout.map(|out| {
            thread::spawn(move || {
                let reader = BufReader::new(out);
                for line in reader.lines().map_while(std::result::Result::ok) {
                    let _ = tx.send(line);
                }
            })
        });
        let stderr_handle = stderr.map(|err| {
            thread::spawn(move || {
                let reader = BufReader::new(err);
                for line in reader.lines().map_while(std::result::Result::ok) {
                    let _ = tx_err.send(line);
                }
            })
        });

        let mut captured = String::new();
        for line in rx {
            println!("{}", line);
            captured.push_str(&line);
            captured.push('\n');
        }

        if let Some(handle) = stdout_handle {
            let _ = handle.join();
        }
        if let Some(handle) = stderr_handle {
            let _ = handle.join();
        }

        let status = child.wait().map_err(|e| VappkitError::ExecutionFailed {
            command: rendered.clone(),
            code: None,
            output: e.to_string(),
        })?;

        if status.success() {
            tracing::info!("...done");
            Ok(ExecOutput {
                exit_code: status.code(),
                output: captured,
            })
        } else {
            Err(VappkitError::ExecutionFailed {
                command: rendered,
                code: status.code(),
                output: captured,
            })
        }
    }
}

/// Split an argv into program and arguments, prefixing `sudo` when
/// elevation is requested on Unix and the process is not already root.
fn split_command(argv: &[String], elevate: bool) -> Option<(String, Vec<String>)> {
    let first = argv.first()?;
    if elevate && cfg!(unix) && !is_root() {
        Some(("sudo".to_string(), argv.to_vec()))
    } else {
        Some((first.clone(), argv[1..].to_vec()))
    }
}

#[cfg(test)]
pub mod testing {
    //! Scripted runner for installer and orchestrator tests.

    use super::*;
    use std::cell::RefCell;

    /// Records every invocation and fails commands whose rendered form
    /// contains a configured pattern.
    #[derive(Default)]
    pub struct ScriptedRunner {
        pub fail_matching: Option<String>,
        pub calls: RefCell<Vec<(String, bool)>>,
    }

    impl ScriptedRunner {
        pub fn succeeding() -> Self {
            Self::default()
        }

        pub fn failing_on(pattern: &str) -> Self {
            Self {
                fail_matching: Some(pattern.to_string()),
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }

        pub fn ran_matching(&self, pattern: &str) -> bool {
            self.calls
                .borrow()
                .iter()
                .any(|(cmd, _)| cmd.contains(pattern))
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, argv: &[String], elevate: bool, _cwd: Option<&Path>) -> Result<ExecOutput> {
            let rendered = render_argv(argv);
            self.calls.borrow_mut().push((rendered.clone(), elevate));
            if let Some(pattern) = &self.fail_matching {
                if rendered.contains(pattern.as_str()) {
                    return Err(VappkitError::ExecutionFailed {
                        command: rendered,
                        code: Some(1),
                        output: "scripted failure\n".into(),
                    });
                }
            }
            Ok(ExecOutput {
                exit_code: Some(0),
                output: String::new(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn successful_command_captures_output() {
        let executor = PrivilegedExecutor::new();
        let result = executor.run(&args(&["echo", "hello"]), false, None).unwrap();

        assert_eq!(result.exit_code, Some(0));
        assert!(result.output.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_typed_error_with_output() {
        let executor = PrivilegedExecutor::new();
        let result = executor.run(
            &args(&["sh", "-c", "echo broken >&2; exit 3"]),
            false,
            None,
        );

        match result {
            Err(VappkitError::ExecutionFailed {
                command,
                code,
                output,
            }) => {
                assert!(command.contains("sh -c"));
                assert_eq!(code, Some(3));
                assert!(output.contains("broken"));
            }
            other => panic!("expected ExecutionFailed, got {:?}", other),
        }
    }

    #[test]
    fn missing_binary_is_typed_error() {
        let executor = PrivilegedExecutor::new();
        let result = executor.run(&args(&["no-such-binary-xyz"]), false, None);
        assert!(matches!(
            result,
            Err(VappkitError::ExecutionFailed { code: None, .. })
        ));
    }

    #[test]
    fn empty_argv_is_rejected() {
        let executor = PrivilegedExecutor::new();
        let result = executor.run(&[], false, None);
        assert!(matches!(
            result,
            Err(VappkitError::InvalidConfiguration { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn cwd_is_honored() {
        let temp = tempfile::TempDir::new().unwrap();
        let executor = PrivilegedExecutor::new();
        let result = executor
            .run(&args(&["pwd"]), false, Some(temp.path()))
            .unwrap();
        // Canonicalize to survive symlinked temp dirs (macOS /tmp).
        let canonical = temp.path().canonicalize().unwrap();
        let printed = std::path::Path::new(result.output.trim())
            .canonicalize()
            .unwrap();
        assert_eq!(printed, canonical);
    }

    #[test]
    fn split_command_unelevated_passes_through() {
        let (program, rest) = split_command(&args(&["make", "install"]), false).unwrap();
        assert_eq!(program, "make");
        assert_eq!(rest, args(&["install"]));
    }

    #[cfg(unix)]
    #[test]
    fn split_command_elevated_prefixes_sudo_for_non_root() {
        let (program, rest) = split_command(&args(&["cp", "a", "b"]), true).unwrap();
        if is_root() {
            assert_eq!(program, "cp");
        } else {
            assert_eq!(program, "sudo");
            assert_eq!(rest, args(&["cp", "a", "b"]));
        }
    }

    #[test]
    fn render_argv_joins_with_spaces() {
        assert_eq!(render_argv(&args(&["make", "install"])), "make install");
    }

    #[test]
    fn scripted_runner_records_and_fails() {
        use super::testing::ScriptedRunner;

        let runner = ScriptedRunner::failing_on("apt-get");
        assert!(runner.run(&args(&["make"]), false, None).is_ok());
        assert!(runner
            .run(&args(&["apt-get", "install", "x"]), true, None)
            .is_err());
        assert_eq!(runner.call_count(), 2);
        assert!(runner.ran_matching("make"));
    }
}
