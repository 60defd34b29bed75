// Core modules
pub mod config;
pub mod error;
pub mod version;

// Re-export commonly used types
pub use error::{PandoclabError, Result};
pub use version::{Version, VersionRange};
