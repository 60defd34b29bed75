use super::Version;
use crate::error::{PandoclabError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a single range clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    // Two-character operators first so `<=` is not read as `<`
    const ALL: [(&'static str, Comparator); 6] = [
        ("==", Comparator::Eq),
        ("!=", Comparator::Ne),
        ("<=", Comparator::Le),
        (">=", Comparator::Ge),
        ("<", Comparator::Lt),
        (">", Comparator::Gt),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Eq => "==",
            Comparator::Ne => "!=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Comparator::Eq => ordering == Ordering::Equal,
            Comparator::Ne => ordering != Ordering::Equal,
            Comparator::Lt => ordering == Ordering::Less,
            Comparator::Le => ordering != Ordering::Greater,
            Comparator::Gt => ordering == Ordering::Greater,
            Comparator::Ge => ordering != Ordering::Less,
        }
    }
}

/// One `<comparator><version>` clause of a [`VersionRange`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionClause {
    pub comparator: Comparator,
    pub version: Version,
}

impl VersionClause {
    /// Whether `version` satisfies this clause
    pub fn satisfies(&self, version: &Version) -> bool {
        self.comparator.accepts(version.cmp(&self.version))
    }

    fn parse(range: &str, clause: &str) -> Result<Self> {
        let (comparator, rest) = Comparator::ALL
            .iter()
            .find_map(|(op, comparator)| clause.strip_prefix(op).map(|rest| (*comparator, rest)))
            .ok_or_else(|| {
                PandoclabError::parse(
                    "version range",
                    range,
                    format!("clause '{}' must start with one of == != < <= > >=", clause),
                )
            })?;

        let literal = rest.trim_start();
        let literal = literal.strip_prefix('v').unwrap_or(literal);

        let version = Version::parse(literal).map_err(|_| {
            PandoclabError::parse(
                "version range",
                range,
                format!("clause '{}' has no valid version", clause),
            )
        })?;

        Ok(Self {
            comparator,
            version,
        })
    }
}

impl fmt::Display for VersionClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.comparator.as_str(), self.version)
    }
}

/// A conjunction of version clauses, e.g. `>=1.12, <2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    clauses: Vec<VersionClause>,
}

impl VersionRange {
    /// Parses a comma separated list of clauses
    ///
    /// Each clause is a comparator (`==`, `!=`, `<`, `<=`, `>`, `>=`)
    /// followed by a version, optionally prefixed with `v`. Whitespace around
    /// clauses and between comparator and version is ignored.
    ///
    /// # Errors
    ///
    /// Returns `PandoclabError::ParseError` if the range is empty, a clause is
    /// empty, a clause lacks a comparator (bare versions are not accepted) or
    /// its version is malformed.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(PandoclabError::parse("version range", text, "empty range"));
        }

        let clauses = text
            .split(',')
            .map(|clause| {
                let clause = clause.trim();
                if clause.is_empty() {
                    return Err(PandoclabError::parse("version range", text, "empty clause"));
                }
                VersionClause::parse(text, clause)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { clauses })
    }

    /// Whether `version` satisfies every clause
    pub fn satisfies(&self, version: &Version) -> bool {
        self.clauses.iter().all(|clause| clause.satisfies(version))
    }

    pub fn clauses(&self) -> &[VersionClause] {
        &self.clauses
    }

    /// The version of a range consisting of a single `==` clause
    pub fn exact(&self) -> Option<&Version> {
        match self.clauses.as_slice() {
            [clause] if clause.comparator == Comparator::Eq => Some(&clause.version),
            _ => None,
        }
    }
}

impl From<Version> for VersionRange {
    fn from(version: Version) -> Self {
        Self {
            clauses: vec![VersionClause {
                comparator: Comparator::Eq,
                version,
            }],
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

impl FromStr for VersionRange {
    type Err = PandoclabError;

    fn from_str(s: &str) -> Result<Self> {
        VersionRange::parse(s)
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        VersionRange::parse(&text).map_err(serde::de::Error::custom)
    }
}
