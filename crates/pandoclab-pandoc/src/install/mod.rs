//! Pandoc releases: listing, selection, and installation
//!
//! ```text
//! ReleaseCatalog::list()
//!     → GET {api_url}            (page 1)
//!     → follow Link rel="next"   (until a stop rule fires)
//!     ↓
//! Release / Asset
//!     ↓
//! download()
//!     → mirror {dir}/pandoc-X-1-{arch}.deb
//!     → dpkg --fsys-tarfile | extract usr/bin/pandoc → {bin}/X
//! ```

pub mod catalog;
pub mod download;
pub mod platform;
pub mod release;

// Re-export for convenience
pub use catalog::{ListOptions, ReleaseCatalog};
pub use download::{DownloadOptions, KNOWN_BAD_PREFIX, download, extract_executable};
pub use platform::{Arch, asset_name_suffix, binary_name, detect_arch};
pub use release::{Asset, Release};

use pandoclab_core::{PandoclabError, Result};
use std::path::PathBuf;

/// Default directory for mirrored packages
///
/// Platform-specific paths:
/// - macOS: ~/Library/Caches/pandoclab/releases
/// - Linux: ~/.cache/pandoclab/releases
/// - Windows: %LOCALAPPDATA%\pandoclab\releases
pub fn default_release_dir() -> Result<PathBuf> {
    Ok(cache_base()?.join("releases"))
}

/// Default directory for extracted executables (`{cache}/pandoclab/bin`)
pub fn default_bin_dir() -> Result<PathBuf> {
    Ok(cache_base()?.join("bin"))
}

fn cache_base() -> Result<PathBuf> {
    let base = dirs::cache_dir().ok_or_else(|| {
        PandoclabError::ConfigError("could not determine cache directory".to_string())
    })?;
    Ok(base.join("pandoclab"))
}
