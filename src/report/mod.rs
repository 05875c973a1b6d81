//! Per-run installation reporting.
//!
//! The report aggregates every managed tool's outcome for presentation.
//! It is built incrementally by the orchestrator, rendered once, and
//! never persisted.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::helpers::state::{ToolState, ToolStatus};

/// Rendered outcome of one managed tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Found {
        path: PathBuf,
        version: Option<String>,
    },
    Installed {
        path: PathBuf,
        version: Option<String>,
    },
    NotFound,
    InstallFailed {
        detail: String,
    },
}

impl Outcome {
    /// Map a terminal tool state to its report outcome.
    pub fn from_state(state: &ToolState) -> Outcome {
        match (state.status, &state.resolved_path) {
            (ToolStatus::Found, Some(path)) => Outcome::Found {
                path: path.clone(),
                version: state.resolved_version.clone(),
            },
            (ToolStatus::Installed, Some(path)) => Outcome::Installed {
                path: path.clone(),
                version: state.resolved_version.clone(),
            },
            (ToolStatus::InstallFailed, _) => Outcome::InstallFailed {
                detail: state
                    .failure_detail
                    .clone()
                    .unwrap_or_else(|| "unknown failure".into()),
            },
            _ => Outcome::NotFound,
        }
    }

    /// Terminal success: the tool is usable.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Found { .. } | Outcome::Installed { .. })
    }

    /// The outcome text of a report line.
    pub fn render(&self) -> String {
        match self {
            Outcome::Found { path, version } => format!(
                "found at {}, version {}",
                path.display(),
                version.as_deref().unwrap_or("unknown")
            ),
            Outcome::Installed { path, version } => format!(
                "installed to {}, version {}",
                path.display(),
                version.as_deref().unwrap_or("unknown")
            ),
            Outcome::NotFound => "NOT FOUND".to_string(),
            Outcome::InstallFailed { detail } => format!("installation failed: {}", detail),
        }
    }
}

/// Aggregated outcome of one orchestrator run.
#[derive(Debug, Default)]
pub struct InstallationReport {
    outcomes: BTreeMap<String, Outcome>,
}

impl InstallationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, outcome: Outcome) {
        self.outcomes.insert(name.to_string(), outcome);
    }

    pub fn get(&self, name: &str) -> Option<&Outcome> {
        self.outcomes.get(name)
    }

    /// Outcomes sorted by tool name.
    pub fn outcomes(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.outcomes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// False when any tool ended `NOT FOUND` or `installation failed`.
    pub fn overall_success(&self) -> bool {
        self.outcomes.values().all(Outcome::is_success)
    }

    /// Render the full report: header, separator, one wrapped entry per
    /// tool sorted by name, trailing blank line.
    pub fn render(&self, width: usize) -> String {
        let label_width = self
            .outcomes
            .keys()
            .map(|name| name.len() + 1)
            .max()
            .unwrap_or(0)
            + 1;

        let mut out = String::from("Results:\n-------------\n");
        for (name, outcome) in &self.outcomes {
            let label = format!("{:<label_width$}", format!("{}:", name));
            for line in wrap_entry(&label, &outcome.render(), width) {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out.push('\n');
        out
    }
}

/// Greedy word wrap of `text` after `label`, continuation lines indented
/// to align under the outcome column.
fn wrap_entry(label: &str, text: &str, width: usize) -> Vec<String> {
    let indent = label.len();
    let mut lines = Vec::new();
    let mut current = label.to_string();
    let mut column = indent;

    for word in text.split_whitespace() {
        let fits = column == indent || column + 1 + word.len() <= width;
        if fits {
            if column > indent {
                current.push(' ');
                column += 1;
            }
            current.push_str(word);
            column += word.len();
        } else {
            lines.push(current);
            current = format!("{}{}", " ".repeat(indent), word);
            column = indent + word.len();
        }
    }
    lines.push(current);
    lines
}
