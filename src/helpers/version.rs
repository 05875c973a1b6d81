//! Helper version parsing and ordering.
//!
//! Versions are compared as dotted numeric components with missing
//! components treated as zero, so `2.1` and `2.1.0` compare equal.

use std::cmp::Ordering;
use std::fmt;

/// A parsed dotted-numeric version, ordered for minimum-version checks.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u32>,
    raw: String,
}

impl Version {
    /// Parse a version string like `1.4` or `v2.1.0`.
    ///
    /// Returns `None` when any component is non-numeric; callers treat an
    /// unparsable version as unknown rather than as an error.
    pub fn parse(raw: &str) -> Option<Version> {
        let trimmed = raw.trim().trim_start_matches('v');
        if trimmed.is_empty() {
            return None;
        }
        let parts = trimmed
            .split('.')
            .map(|p| p.parse::<u32>().ok())
            .collect::<Option<Vec<u32>>>()?;
        Some(Version {
            parts,
            raw: trimmed.to_string(),
        })
    }

    /// The version string as parsed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).copied().unwrap_or(0);
            let b = other.parts.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}
