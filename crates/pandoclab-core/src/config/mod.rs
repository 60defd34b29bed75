//! pandoclab.toml loading and environment overrides

pub mod consts;
mod model;

pub use model::{Config, PandocConfig, ReleasesConfig};

use crate::error::{PandoclabError, Result};
use std::path::Path;

impl Config {
    /// Parses a configuration file
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read and `ConfigParseError`
    /// if it is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PandoclabError::IoError {
            operation: "read config".to_string(),
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads `path` when given, otherwise the defaults, then applies the
    /// environment on top
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Defaults with the process environment applied
    pub fn from_env() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Applies `PANDOC_PATH` and `GITHUB_TOKEN` from `lookup`
    ///
    /// Empty values are ignored.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(bin) = get(consts::PANDOC_PATH_ENV) {
            self.pandoc.bin = Some(bin);
        }
        if let Some(token) = get(consts::GITHUB_TOKEN_ENV) {
            self.releases.token = Some(token);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pandoc.bin, None);
        assert!(config.pandoc.arguments.is_empty());
        assert_eq!(config.releases.api_url, consts::DEFAULT_RELEASES_API);
        assert_eq!(config.releases.timeout_secs, consts::DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::parse(
            r#"
[pandoc]
bin = "/opt/pandoc/bin/pandoc"
arguments = ["--standalone"]

[releases]
arch = "arm64"
dir = "/var/cache/pandoc"
"#,
        )
        .unwrap();

        assert_eq!(config.pandoc.bin.as_deref(), Some("/opt/pandoc/bin/pandoc"));
        assert_eq!(config.pandoc.arguments, vec!["--standalone".to_string()]);
        assert_eq!(config.releases.arch.as_deref(), Some("arm64"));
        assert_eq!(config.releases.dir, Some(PathBuf::from("/var/cache/pandoc")));
        assert_eq!(config.releases.api_url, consts::DEFAULT_RELEASES_API);
    }

    #[test]
    fn test_parse_empty_file() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_invalid() {
        let err = Config::parse("[pandoc]\narguments = 3\n").unwrap_err();
        assert!(matches!(err, PandoclabError::ConfigParseError(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/pandoclab.toml")).unwrap_err();
        assert!(matches!(err, PandoclabError::IoError { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(consts::CONFIG_FILE);
        std::fs::write(&path, "[releases]\ntimeout_secs = 5\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.releases.timeout_secs, 5);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PANDOC_PATH", "/usr/local/bin/pandoc"),
            ("GITHUB_TOKEN", "secret"),
        ]
        .into_iter()
        .collect();

        let config = Config::default().with_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.pandoc.bin.as_deref(), Some("/usr/local/bin/pandoc"));
        assert_eq!(config.releases.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let mut config = Config::default();
        config.pandoc.bin = Some("pandoc-3".to_string());

        let config = config.with_env(|_| Some(String::new()));
        assert_eq!(config.pandoc.bin.as_deref(), Some("pandoc-3"));
        assert_eq!(config.releases.token, None);
    }
}
