use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::consts;

/// pandoclab.toml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub pandoc: PandocConfig,
    #[serde(default)]
    pub releases: ReleasesConfig,
}

/// How the pandoc executable is located and invoked
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PandocConfig {
    /// Executable name or path; `PANDOC_PATH` and then `pandoc` when unset
    #[serde(default)]
    pub bin: Option<String>,
    /// Arguments passed before every invocation
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// Release catalog and download settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleasesConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// GitHub token sent as bearer authorization
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Debian architecture of downloaded packages (e.g. `amd64`)
    #[serde(default)]
    pub arch: Option<String>,
    /// Directory for downloaded packages
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Directory for extracted executables
    #[serde(default)]
    pub bin: Option<PathBuf>,
}

impl Default for ReleasesConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
            arch: None,
            dir: None,
            bin: None,
        }
    }
}

fn default_api_url() -> String {
    consts::DEFAULT_RELEASES_API.to_string()
}

fn default_timeout_secs() -> u64 {
    consts::DEFAULT_TIMEOUT_SECS
}
