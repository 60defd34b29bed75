//! Pandoc executable handling and release installation for pandoclab.
//!
//! # Architecture
//!
//! - [`pandoc`]: the [`Pandoc`] handle bound to one executable
//! - [`resolve`]: locating the executable and probing its capabilities
//! - [`info`]: parsing of pandoc's self-report
//! - [`exec`]: running pandoc with per-stream redirection
//! - [`github`]: HTTP client seam for the GitHub releases API
//! - [`install`]: release listing, package download and extraction
//!
//! # Locating pandoc
//!
//! ```text
//! Pandoc::locate(hint, env)
//!     ↓
//! 1. hint, else PANDOC_PATH, else "pandoc"
//!     ↓
//! 2. bare names → which::which
//!     ↓
//! 3. pandoc --version → version, data dir, libraries
//!     ↓ (>= 1.18)
//! 4. --list-input-formats / --list-output-formats / --list-highlight-languages
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use pandoclab_pandoc::Pandoc;
//! use pandoclab_core::VersionRange;
//!
//! # fn main() -> pandoclab_core::Result<()> {
//! let pandoc = Pandoc::new(None)?;
//! pandoc.require(&VersionRange::parse(">=2.0")?)?;
//!
//! let html = pandoc.convert::<&str>("markdown", "html", "*hello*", &[])?;
//! println!("{}", html);
//! # Ok(())
//! # }
//! ```
//!
//! ## Installing a release
//!
//! ```no_run
//! use pandoclab_pandoc::install::{DownloadOptions, ReleaseCatalog};
//! use pandoclab_core::config::ReleasesConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> pandoclab_core::Result<()> {
//! let catalog = ReleaseCatalog::github(&ReleasesConfig::default())?;
//! let release = catalog.get("2.19.2")?;
//!
//! let options = DownloadOptions {
//!     dir: Some(PathBuf::from("/tmp/pandoc/releases")),
//!     arch: Some("amd64".to_string()),
//!     bin: Some(PathBuf::from("/tmp/pandoc/bin")),
//!     ..DownloadOptions::default()
//! };
//! catalog.download(&release, &options)?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod exec;
pub mod github;
pub mod info;
pub mod install;
pub mod pandoc;
pub mod resolve;

// Re-export commonly used types
pub use exec::{Captured, Input, IoOptions, LAUNCH_FAILED, Output, RunOutcome};
pub use info::{BinSource, VersionReport};
pub use install::{DownloadOptions, ListOptions, Release, ReleaseCatalog};
pub use pandoc::Pandoc;

// Type alias for convenience
pub type Result<T> = pandoclab_core::Result<T>;
