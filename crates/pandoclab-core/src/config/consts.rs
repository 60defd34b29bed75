//! Constants shared across the workspace

/// Environment variable naming the pandoc executable
pub const PANDOC_PATH_ENV: &str = "PANDOC_PATH";

/// Environment variable holding a GitHub API token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Executable name used when nothing else is configured
pub const DEFAULT_PANDOC_BIN: &str = "pandoc";

/// Release collection endpoint of the pandoc repository
pub const DEFAULT_RELEASES_API: &str = "https://api.github.com/repos/jgm/pandoc/releases";

/// HTTP timeout for API requests and downloads
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default configuration file name
pub const CONFIG_FILE: &str = "pandoclab.toml";
