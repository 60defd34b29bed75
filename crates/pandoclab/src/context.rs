//! Global context for CLI commands

use anyhow::{Context as _, Result};
use pandoclab_core::config::Config;
use pandoclab_core::config::consts::CONFIG_FILE;
use pandoclab_pandoc::Pandoc;
use pandoclab_pandoc::github::GithubClient;
use pandoclab_pandoc::install::ReleaseCatalog;
use std::path::PathBuf;

/// Configuration shared by all commands
///
/// Precedence: config file, then environment, then command-line flags.
pub struct Context {
    pub config: Config,
    pub verbose: bool,
}

impl Context {
    /// Loads the configuration and applies `--bin`
    ///
    /// Without `--config`, a `pandoclab.toml` in the current directory is
    /// used when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn new(config_path: Option<PathBuf>, bin: Option<String>, verbose: bool) -> Result<Self> {
        let config_path = config_path.or_else(|| {
            let local = PathBuf::from(CONFIG_FILE);
            local.is_file().then_some(local)
        });

        let mut config = Config::resolve(config_path.as_deref()).with_context(|| match &config_path {
            Some(path) => format!("Failed to load config {}", path.display()),
            None => "Failed to load config".to_string(),
        })?;

        if let Some(bin) = bin {
            config.pandoc.bin = Some(bin);
        }

        Ok(Self { config, verbose })
    }

    /// Locates pandoc as configured
    pub fn pandoc(&self) -> Result<Pandoc> {
        Ok(Pandoc::from_config(&self.config.pandoc)?)
    }

    pub fn catalog(&self) -> Result<ReleaseCatalog<GithubClient>> {
        Ok(ReleaseCatalog::github(&self.config.releases)?)
    }
}
