//! Install command - download a release package and extract pandoc

use crate::context::Context;
use crate::output::print_text;
use anyhow::{Result, anyhow};
use colored::Colorize;
use pandoclab_pandoc::install::{
    DownloadOptions, default_bin_dir, default_release_dir, detect_arch,
};
use std::path::PathBuf;

/// Arguments of `pandoclab install`
pub struct InstallArgs {
    pub tag: String,
    pub dir: Option<PathBuf>,
    pub arch: Option<String>,
    pub bin_dir: Option<PathBuf>,
    pub no_extract: bool,
    pub link: bool,
    pub dpkg: PathBuf,
}

/// Execute `pandoclab install` command
///
/// Flags win over `[releases]` settings, which win over the defaults
/// (host architecture, `{cache}/pandoclab/releases` and `{cache}/pandoclab/bin`).
pub fn execute_install(ctx: &Context, args: InstallArgs) -> Result<()> {
    let releases = &ctx.config.releases;

    let dir = match args.dir.or_else(|| releases.dir.clone()) {
        Some(dir) => dir,
        None => default_release_dir()?,
    };
    let arch = match args.arch.or_else(|| releases.arch.clone()) {
        Some(arch) => arch,
        None => detect_arch()?.to_string(),
    };
    let bin = if args.no_extract {
        None
    } else {
        match args.bin_dir.or_else(|| releases.bin.clone()) {
            Some(bin) => Some(bin),
            None => Some(default_bin_dir()?),
        }
    };

    let catalog = ctx.catalog()?;
    let release = if args.tag == "latest" {
        catalog
            .latest(None)?
            .ok_or_else(|| anyhow!("No releases found at {}", catalog.api_url()))?
    } else {
        catalog.get(&args.tag)?
    };

    let options = DownloadOptions {
        dir: Some(dir),
        arch: Some(arch.clone()),
        bin: bin.clone(),
        verbose: ctx.verbose,
        link: args.link,
        dpkg: args.dpkg,
    };

    match catalog.download(&release, &options)? {
        Some(version) => {
            let location = match &bin {
                Some(bin) => bin.join(version.to_string()).display().to_string(),
                None => "package only".to_string(),
            };
            print_text(&format!(
                "{} Installed pandoc {} ({})",
                "✓".green().bold(),
                version,
                location
            ))?;
        }
        None => {
            print_text(&format!(
                "{} Nothing to install for {} on {}",
                "!".yellow(),
                release.tag_name,
                arch
            ))?;
        }
    }

    Ok(())
}
