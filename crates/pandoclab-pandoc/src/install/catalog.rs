//! Listing and fetching pandoc releases
//!
//! The GitHub API returns releases newest first, spread over pages chained by
//! `Link: <...>; rel="next"` headers. [`ReleaseCatalog::list`] walks those
//! pages one at a time and stops as early as the filter allows.
//!
//! # Example
//!
//! ```no_run
//! use pandoclab_core::config::ReleasesConfig;
//! use pandoclab_pandoc::install::{ListOptions, ReleaseCatalog};
//!
//! # fn example() -> pandoclab_core::Result<()> {
//! let catalog = ReleaseCatalog::github(&ReleasesConfig::default())?;
//! let options = ListOptions {
//!     since: "2.18".parse()?,
//!     range: Some(">=2.19, <3".parse()?),
//!     ..ListOptions::default()
//! };
//!
//! for release in catalog.list(&options)? {
//!     println!("{}", release.tag_name);
//! }
//! # Ok(())
//! # }
//! ```

use super::download::{DownloadOptions, download};
use super::release::Release;
use crate::github::{GithubClient, HttpClient, HttpResponse, next_link, release_tag_url};
use pandoclab_core::config::ReleasesConfig;
use pandoclab_core::{PandoclabError, Result, Version, VersionRange};
use serde_json::Value;

/// Filters for [`ReleaseCatalog::list`]
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Only releases strictly newer than this version
    pub since: Version,
    /// Only releases satisfying this range
    pub range: Option<VersionRange>,
    /// Report each page URL before fetching it
    pub verbose: bool,
    /// Stop once this many releases are collected
    pub limit: Option<usize>,
}

/// Release metadata source backed by an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct ReleaseCatalog<C> {
    client: C,
    api_url: String,
}

impl ReleaseCatalog<GithubClient> {
    /// Catalog over the configured API URL using a [`GithubClient`]
    pub fn github(config: &ReleasesConfig) -> Result<Self> {
        Ok(Self::new(GithubClient::from_config(config)?, &config.api_url))
    }
}

impl<C: HttpClient> ReleaseCatalog<C> {
    /// `api_url` is the releases collection endpoint, e.g.
    /// `https://api.github.com/repos/jgm/pandoc/releases`
    pub fn new(client: C, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetches the release tagged `tag`
    ///
    /// # Errors
    ///
    /// Returns `FetchFailed` naming the URL if the request fails or does not
    /// succeed, and `ParseError` if the response is not a release object.
    pub fn get(&self, tag: &str) -> Result<Release> {
        let url = release_tag_url(&self.api_url, tag)?;
        tracing::debug!(%url, "fetching release");

        let (body, _) = self.fetch_json(&url)?;
        Release::from_json(body)
    }

    /// Lists releases newest first
    ///
    /// Pages are fetched sequentially. The listing stops
    /// - at the first release not newer than `options.since`,
    /// - right after the match of an exact range such as `==2.1.2`,
    /// - once `options.limit` releases are collected,
    /// - when a page has no `rel="next"` link.
    ///
    /// The first two stops are only correct because the API orders releases
    /// newest first; a reordered API would silently truncate the result.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailed` naming the URL of the failing page, and
    /// `ParseError` for an entry that is not a release.
    pub fn list(&self, options: &ListOptions) -> Result<Vec<Release>> {
        let exact = options.range.as_ref().and_then(VersionRange::exact).is_some();
        let mut releases = Vec::new();
        let mut next = Some(self.api_url.clone());

        if options.limit == Some(0) {
            return Ok(releases);
        }

        while let Some(url) = next.take() {
            if options.verbose {
                tracing::info!(%url, "fetching releases");
            } else {
                tracing::debug!(%url, "fetching releases");
            }

            let (body, response) = self.fetch_json(&url)?;
            let Value::Array(entries) = body else {
                return Err(PandoclabError::fetch(&url, "expected a JSON array of releases"));
            };

            for entry in entries {
                let release = Release::from_json(entry)?;

                if release.version <= options.since {
                    return Ok(releases);
                }

                let wanted = options
                    .range
                    .as_ref()
                    .is_none_or(|range| range.satisfies(&release.version));
                if !wanted {
                    continue;
                }

                releases.push(release);
                if exact || options.limit.is_some_and(|limit| releases.len() >= limit) {
                    return Ok(releases);
                }
            }

            next = response.header("link").and_then(next_link);
        }

        Ok(releases)
    }

    /// Newest release satisfying `range`, if any
    pub fn latest(&self, range: Option<VersionRange>) -> Result<Option<Release>> {
        let options = ListOptions {
            range,
            limit: Some(1),
            ..ListOptions::default()
        };
        Ok(self.list(&options)?.into_iter().next())
    }

    /// Downloads the package of `release` with this catalog's client
    ///
    /// See [`download`] for the steps and return values.
    pub fn download(&self, release: &Release, options: &DownloadOptions) -> Result<Option<Version>> {
        download(&self.client, release, options)
    }

    fn fetch_json(&self, url: &str) -> Result<(Value, HttpResponse)> {
        let response = self.client.get(url)?;
        if !response.is_success() {
            return Err(PandoclabError::fetch(url, format!("HTTP status {}", response.status)));
        }

        let body = serde_json::from_slice(&response.body)
            .map_err(|e| PandoclabError::fetch(url, format!("invalid JSON: {}", e)))?;
        Ok((body, response))
    }
}
