use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PandoclabError {
    // Version errors
    #[error("PARSE_ERROR: invalid {kind} '{input}': {reason}")]
    ParseError {
        kind: &'static str,
        input: String,
        reason: String,
    },

    #[error("VERSION_MISMATCH: pandoc {range} required, found {found}")]
    VersionMismatch { range: String, found: String },

    // Executable errors
    #[error("PANDOC_NOT_FOUND: no usable pandoc executable at '{path}': {reason}")]
    NotFound { path: String, reason: String },

    #[error("CONVERSION_FAILED: pandoc exited with code {exit_code}: {stderr}")]
    ConversionFailed { exit_code: i32, stderr: String },

    // Release errors
    #[error("FETCH_FAILED: {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("EXTRACTION_FAILED: `{command}` failed: {reason}")]
    ExtractionFailed { command: String, reason: String },

    // Config errors
    #[error("CONFIG_ERROR: {0}")]
    ConfigError(String),

    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    // IO errors
    #[error("IO_ERROR: {operation} '{}': {source}", path.display())]
    IoError {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl PandoclabError {
    /// Shorthand for a [`PandoclabError::ParseError`]
    pub fn parse(kind: &'static str, input: &str, reason: impl Into<String>) -> Self {
        PandoclabError::ParseError {
            kind,
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`PandoclabError::FetchFailed`]
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        PandoclabError::FetchFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for PandoclabError {
    fn from(err: toml::de::Error) -> Self {
        PandoclabError::ConfigParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PandoclabError>;
