//! Dotted numeric versions and version ranges
//!
//! Pandoc numbers its releases with an arbitrary number of integer components
//! (`1.19.2.4`, `2.5`, `3.1.11.1`), so semver does not apply. This module
//! provides:
//!
//! - [`Version`]: an immutable sequence of components ordered left to right,
//!   with missing trailing components treated as zero (`1.2 == 1.2.0`)
//! - [`VersionRange`]: a comma separated list of comparator clauses that must
//!   all hold (`>=1.12, <2`)
//!
//! # Example
//!
//! ```
//! use pandoclab_core::version::{Version, VersionRange};
//!
//! let version: Version = "2.19.2".parse()?;
//! let range: VersionRange = ">=2.11, !=2.19.1".parse()?;
//! assert!(range.satisfies(&version));
//! assert!(version.matches(&"2.19".parse()?));
//! # Ok::<(), pandoclab_core::PandoclabError>(())
//! ```

mod range;

pub use range::{Comparator, VersionClause, VersionRange};

use crate::error::{PandoclabError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A dotted numeric version such as `2.19.2`
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u64>,
}

impl Version {
    /// Parses a dotted numeric version string
    ///
    /// Every `.`-separated segment must be a non-negative decimal integer.
    ///
    /// # Errors
    ///
    /// Returns `PandoclabError::ParseError` if the input is empty or any
    /// segment is empty or non-numeric.
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(PandoclabError::parse("version", text, "empty version"));
        }

        let parts = text
            .split('.')
            .map(|segment| parse_segment(text, segment))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { parts })
    }

    /// Builds a version from its components
    ///
    /// # Panics
    ///
    /// Panics if `parts` is empty.
    pub fn from_parts(parts: impl Into<Vec<u64>>) -> Self {
        let parts = parts.into();
        assert!(!parts.is_empty(), "a version needs at least one component");
        Self { parts }
    }

    /// Components as parsed, without zero padding
    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    /// Whether all components of `prefix` equal the leading components of `self`
    ///
    /// `2.19.2` matches `2`, `2.19` and `2.19.2` but not `2.1`.
    pub fn matches(&self, prefix: &Version) -> bool {
        prefix
            .parts
            .iter()
            .enumerate()
            .all(|(i, part)| self.component(i) == *part)
    }

    /// Numeric encoding with three decimal digits per component
    ///
    /// `1.19.2` becomes `1.019002`. Components above 999 overlap with the next
    /// position, so this is only meaningful for pandoc-sized numbers.
    pub fn number(&self) -> f64 {
        self.parts
            .iter()
            .enumerate()
            .map(|(i, part)| *part as f64 / 1000f64.powi(i as i32))
            .sum()
    }

    fn component(&self, index: usize) -> u64 {
        self.parts.get(index).copied().unwrap_or(0)
    }

    /// Components with trailing zeros removed (keeps at least one)
    fn significant(&self) -> &[u64] {
        let len = self
            .parts
            .iter()
            .rposition(|part| *part != 0)
            .map_or(1, |i| i + 1);
        &self.parts[..len]
    }
}

fn parse_segment(text: &str, segment: &str) -> Result<u64> {
    if segment.is_empty() {
        return Err(PandoclabError::parse("version", text, "empty component"));
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PandoclabError::parse(
            "version",
            text,
            format!("component '{}' is not a number", segment),
        ));
    }
    segment
        .parse()
        .map_err(|e| PandoclabError::parse("version", text, format!("{}", e)))
}

/// Compares two versions component-wise, padding the shorter one with zeros
pub fn compare(a: &Version, b: &Version) -> Ordering {
    let len = a.parts.len().max(b.parts.len());
    (0..len)
        .map(|i| a.component(i).cmp(&b.component(i)))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with Eq: 1.2 and 1.2.0 hash the same
        self.significant().hash(state);
    }
}

impl Default for Version {
    fn default() -> Self {
        Self { parts: vec![0] }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in &self.parts {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", part)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = PandoclabError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Version::parse(&text).map_err(serde::de::Error::custom)
    }
}
