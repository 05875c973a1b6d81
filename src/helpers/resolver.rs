//! Prerequisite closure resolution.
//!
//! Expands a tool into the ordered list of names that must be installed,
//! prerequisites strictly before dependents, skipping anything already
//! satisfied. Prerequisites are walked in declaration order so the result
//! is deterministic and installs are reproducible.

use std::collections::HashSet;

use crate::error::{Result, VappkitError};
use crate::helpers::descriptor::ToolDescriptor;
use crate::helpers::registry::ToolRegistry;

/// Resolve the install order for `descriptor`.
///
/// `satisfied` holds names already present or installed earlier in this
/// run; they (and their own prerequisites) are skipped. The returned list
/// ends with the tool itself. A cycle or an unknown prerequisite is a
/// configuration error, not a per-tool failure.
pub fn resolve_install_order(
    registry: &ToolRegistry,
    descriptor: &ToolDescriptor,
    satisfied: &HashSet<String>,
) -> Result<Vec<String>> {
    let mut order = Vec::new();
    let mut visiting = Vec::new();
    expand(registry, descriptor, satisfied, &mut order, &mut visiting)?;
    Ok(order)
}

fn expand(
    registry: &ToolRegistry,
    descriptor: &ToolDescriptor,
    satisfied: &HashSet<String>,
    order: &mut Vec<String>,
    visiting: &mut Vec<String>,
) -> Result<()> {
    if visiting.contains(&descriptor.name) {
        let mut cycle = visiting.clone();
        cycle.push(descriptor.name.clone());
        return Err(VappkitError::CircularDependency {
            cycle: cycle.join(" -> "),
        });
    }
    visiting.push(descriptor.name.clone());

    for prereq in &descriptor.prerequisites {
        if satisfied.contains(prereq) || order.contains(prereq) {
            continue;
        }
        let Some(spec) = registry.get(prereq) else {
            return Err(VappkitError::InvalidConfiguration {
                message: format!(
                    "'{}' names unknown prerequisite '{}'",
                    descriptor.name, prereq
                ),
            });
        };
        expand(registry, &spec.descriptor, satisfied, order, visiting)?;
    }

    visiting.pop();
    if !order.contains(&descriptor.name) {
        order.push(descriptor.name.clone());
    }
    Ok(())
}
