//! Pandoc self-report parsing
//!
//! `pandoc --version` output differs between releases:
//!
//! ```text
//! pandoc 1.12.4.2
//! Compiled with texmath 0.6.6.1, highlighting-kate 0.5.8.5.
//! Syntax highlighting is supported for the following languages:
//!     actionscript, ada, apache, asn1, ...
//! Default user data directory: /home/user/.pandoc
//!
//! pandoc 2.19.2
//! Compiled with pandoc-types 1.22.2.1, texmath 0.12.5.2, skylighting 0.13,
//! citeproc 0.8.0.1, ipynb 0.2, hslua 2.2.1
//! Scripting engine: Lua 5.4
//! User data directory: /home/user/.local/share/pandoc
//! ```
//!
//! Every section except the first line is optional.

use pandoclab_core::{PandoclabError, Result, Version};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Where a located executable came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinSource {
    /// Passed explicitly by the caller
    Explicit,
    /// `PANDOC_PATH` environment variable
    Environment,
    /// Default name looked up on `PATH`
    Default,
}

impl fmt::Display for BinSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinSource::Explicit => write!(f, "explicit path"),
            BinSource::Environment => write!(f, "PANDOC_PATH"),
            BinSource::Default => write!(f, "system PATH"),
        }
    }
}

/// Parsed `--version` output
#[derive(Debug, Clone, PartialEq)]
pub struct VersionReport {
    /// Program name from the first line
    pub name: String,
    pub version: Version,
    /// User data directory, absent on some older releases
    pub data_dir: Option<PathBuf>,
    /// Compiled-in libraries with their versions
    pub libraries: BTreeMap<String, Version>,
    /// Highlight languages listed inline by pre-1.18 releases
    pub highlight_languages: BTreeSet<String>,
}

const DATA_DIR_LABELS: [&str; 2] = ["Default user data directory:", "User data directory:"];
const COMPILED_WITH: &str = "Compiled with";
const HIGHLIGHT_HEADER: &str = "Syntax highlighting is supported for the following languages:";

/// Parses `--version` output
///
/// # Errors
///
/// Returns `ParseError` if the first line is not `<name> <version>`.
pub fn parse_version_report(text: &str) -> Result<VersionReport> {
    let mut lines = text.lines();

    let first = lines.next().unwrap_or_default().trim();
    let mut words = first.split_whitespace();
    let (name, version_text) = match (words.next(), words.next()) {
        (Some(name), Some(version)) => (name, version),
        _ => {
            return Err(PandoclabError::parse(
                "version report",
                first,
                "expected '<name> <version>'",
            ));
        }
    };
    let version = Version::parse(version_text.strip_prefix('v').unwrap_or(version_text))?;

    let mut report = VersionReport {
        name: name.to_string(),
        version,
        data_dir: None,
        libraries: BTreeMap::new(),
        highlight_languages: BTreeSet::new(),
    };

    let rest: Vec<&str> = lines.collect();
    let mut i = 0;
    while i < rest.len() {
        let line = rest[i].trim();
        i += 1;

        if let Some(dir) = DATA_DIR_LABELS
            .iter()
            .find_map(|label| line.strip_prefix(label))
        {
            let dir = dir.trim();
            if !dir.is_empty() {
                report.data_dir = Some(PathBuf::from(dir));
            }
        } else if let Some(first_items) = line.strip_prefix(COMPILED_WITH) {
            // Block continues until a blank line or the next "Key:" line
            let mut block = first_items.to_string();
            while i < rest.len() {
                let next = rest[i].trim();
                if next.is_empty() || next.contains(':') {
                    break;
                }
                block.push(' ');
                block.push_str(next);
                i += 1;
            }
            report.libraries.extend(parse_libraries(&block));
        } else if line == HIGHLIGHT_HEADER {
            while i < rest.len() && rest[i].starts_with(char::is_whitespace) {
                let items = rest[i].split(',').map(str::trim).filter(|s| !s.is_empty());
                report.highlight_languages.extend(items.map(str::to_string));
                i += 1;
            }
        }
    }

    Ok(report)
}

/// Comma separated `name version` or `name (version)` items
///
/// Items whose version does not parse are skipped.
fn parse_libraries(block: &str) -> impl Iterator<Item = (String, Version)> + '_ {
    block
        .trim()
        .trim_end_matches('.')
        .split(',')
        .filter_map(|item| {
            let item = item.trim();
            let (name, version) = item.rsplit_once(char::is_whitespace)?;
            let version = version.trim_start_matches('(').trim_end_matches(')');
            let version = Version::parse(version.strip_prefix('v').unwrap_or(version)).ok()?;
            Some((name.trim().to_string(), version))
        })
}

/// One entry per non-empty line, as printed by the `--list-*` flags
pub fn parse_lines(text: &str) -> BTreeSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// `--list-extensions` output: `+name` (enabled by default) or `-name`
pub fn parse_extensions(text: &str) -> BTreeMap<String, bool> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| {
            if let Some(name) = line.strip_prefix('+') {
                Some((name.to_string(), true))
            } else {
                line.strip_prefix('-').map(|name| (name.to_string(), false))
            }
        })
        .filter(|(name, _)| !name.is_empty())
        .collect()
}
