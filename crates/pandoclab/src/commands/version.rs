//! Version command - show the located pandoc and what it reports

use crate::context::Context;
use crate::output::{print_json, print_text};
use anyhow::Result;
use colored::Colorize;
use pandoclab_core::VersionRange;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: String,
    path: String,
    source: String,
    data_dir: Option<String>,
    libraries: BTreeMap<String, String>,
}

/// Execute `pandoclab version` command
pub fn execute_version(ctx: &Context, require: Option<String>, json: bool) -> Result<()> {
    // Parse the range before probing so typos fail fast
    let range = require.as_deref().map(VersionRange::parse).transpose()?;

    let pandoc = ctx.pandoc()?;
    if let Some(range) = &range {
        pandoc.require(range)?;
    }

    let info = VersionInfo {
        version: pandoc.version().to_string(),
        path: pandoc.bin().display().to_string(),
        source: pandoc.source().to_string(),
        data_dir: pandoc.data_dir().map(|dir| dir.display().to_string()),
        libraries: pandoc
            .libraries()
            .iter()
            .map(|(name, version)| (name.clone(), version.to_string()))
            .collect(),
    };

    if json {
        return print_json(&info);
    }

    print_text(&format!("pandoc {}", info.version.bold()))?;
    print_text(&format!("Path:     {}", info.path))?;
    print_text(&format!("Source:   {}", info.source))?;
    if let Some(dir) = &info.data_dir {
        print_text(&format!("Data dir: {}", dir))?;
    }
    if !info.libraries.is_empty() {
        print_text("Libraries:")?;
        for (name, version) in &info.libraries {
            print_text(&format!("  {} {}", name, version))?;
        }
    }
    if let Some(range) = &range {
        print_text(&format!("{} satisfies {}", "✓".green().bold(), range))?;
    }

    Ok(())
}
