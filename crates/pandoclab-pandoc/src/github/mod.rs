//! Shared GitHub interaction utilities
//!
//! This module provides the HTTP side of the release catalog:
//! - the [`HttpClient`] seam and its `reqwest` implementation
//! - conditional ("mirror") downloads keyed on `Last-Modified`
//! - URL construction and `Link` header pagination helpers

pub mod client;
pub mod url;

// Re-exports for convenient access
pub use client::{
    DEFAULT_TIMEOUT, GithubClient, HttpClient, HttpResponse, MirrorOutcome, USER_AGENT,
};
pub use url::{next_link, release_tag_url};
