//! Releases command - list pandoc releases from the GitHub API

use crate::context::Context;
use crate::output::{print_json, print_text};
use anyhow::Result;
use colored::Colorize;
use pandoclab_core::{Version, VersionRange};
use pandoclab_pandoc::install::{ListOptions, detect_arch};

/// Execute `pandoclab releases` command
pub fn execute_releases(
    ctx: &Context,
    since: Option<String>,
    range: Option<String>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let options = ListOptions {
        since: since
            .as_deref()
            .map(|text| Version::parse(text.strip_prefix('v').unwrap_or(text)))
            .transpose()?
            .unwrap_or_default(),
        range: range.as_deref().map(VersionRange::parse).transpose()?,
        verbose: ctx.verbose,
        limit,
    };

    let catalog = ctx.catalog()?;
    let releases = catalog.list(&options)?;

    if json {
        return print_json(&releases);
    }

    if releases.is_empty() {
        print_text(&format!("{} No matching releases", "!".yellow()))?;
        return Ok(());
    }

    let arch = ctx
        .config
        .releases
        .arch
        .clone()
        .or_else(|| detect_arch().ok().map(|arch| arch.to_string()));

    for release in &releases {
        let package = arch
            .as_deref()
            .and_then(|arch| release.deb_asset(arch))
            .map(|asset| asset.name.as_str())
            .unwrap_or("-");
        print_text(&format!("{:<12} {}", release.tag_name, package))?;
    }

    Ok(())
}
