//! HTTP collaborator for the GitHub releases API
//!
//! Release listing and package downloads only need two operations, a plain
//! GET and a conditional "mirror" download. They are expressed by the
//! [`HttpClient`] trait so the catalog can be driven by a fake in tests;
//! [`GithubClient`] is the `reqwest::blocking` implementation.

use chrono::{DateTime, Utc};
use pandoclab_core::config::ReleasesConfig;
use pandoclab_core::config::consts::DEFAULT_TIMEOUT_SECS;
use pandoclab_core::{PandoclabError, Result};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION, IF_MODIFIED_SINCE, LAST_MODIFIED};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Default timeout for GitHub requests (packages are large)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// Default user agent for pandoclab requests
pub const USER_AGENT: &str = "pandoclab";

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Response of a GET request
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    /// Header values keyed by lower-case header name
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Looks up a header by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Result of a conditional download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorOutcome {
    pub status: u16,
    /// Whether a body was written to the destination
    pub transferred: bool,
}

impl MirrorOutcome {
    /// 2xx, or 304 when the destination is already current
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) || self.status == StatusCode::NOT_MODIFIED.as_u16()
    }
}

/// The HTTP operations the release catalog relies on
pub trait HttpClient {
    /// Sends a GET request
    ///
    /// Non-2xx statuses are returned as responses; only transport failures
    /// are errors.
    fn get(&self, url: &str) -> Result<HttpResponse>;

    /// Downloads `url` to `dest` unless `dest` is already up to date
    fn mirror(&self, url: &str, dest: &Path) -> Result<MirrorOutcome>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        (**self).get(url)
    }

    fn mirror(&self, url: &str, dest: &Path) -> Result<MirrorOutcome> {
        (**self).mirror(url, dest)
    }
}

impl<T: HttpClient + ?Sized> HttpClient for Box<T> {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        (**self).get(url)
    }

    fn mirror(&self, url: &str, dest: &Path) -> Result<MirrorOutcome> {
        (**self).mirror(url, dest)
    }
}

/// `reqwest` backed [`HttpClient`]
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    token: Option<String>,
}

impl GithubClient {
    /// Builds a client with the given timeout and optional API token
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the TLS backend cannot be initialized
    pub fn new(timeout: Duration, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| PandoclabError::ConfigError(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { client, token })
    }

    pub fn from_config(config: &ReleasesConfig) -> Result<Self> {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            config.token.clone(),
        )
    }

    fn api_request(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url).header(ACCEPT, GITHUB_JSON);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }
}

impl HttpClient for GithubClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self
            .api_request(url)
            .send()
            .map_err(|e| PandoclabError::fetch(url, e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        let body = response
            .bytes()
            .map_err(|e| PandoclabError::fetch(url, e.without_url().to_string()))?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn mirror(&self, url: &str, dest: &Path) -> Result<MirrorOutcome> {
        let mut request = self.client.get(url);
        if let Some(modified) = modified_time(dest) {
            request = request.header(IF_MODIFIED_SINCE, http_date(modified));
        }

        let mut response = request
            .send()
            .map_err(|e| PandoclabError::fetch(url, e.without_url().to_string()))?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED || !status.is_success() {
            return Ok(MirrorOutcome {
                status: status.as_u16(),
                transferred: false,
            });
        }

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_http_date);
        let expected = response.content_length();

        // Write next to the destination so the final rename stays on one filesystem
        let parent = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| io_error("create temporary file in", parent, e))?;

        let written = io::copy(&mut response, &mut temp)
            .map_err(|e| PandoclabError::fetch(url, format!("download interrupted: {}", e)))?;

        if let Some(expected) = expected {
            if written != expected {
                return Err(PandoclabError::fetch(
                    url,
                    format!("size mismatch: expected {} bytes, got {} bytes", expected, written),
                ));
            }
        }

        temp.persist(dest).map_err(|e| io_error("write", dest, e.error))?;

        if let Some(modified) = last_modified {
            set_modified_time(dest, modified)
                .map_err(|e| io_error("set modification time of", dest, e))?;
        }

        Ok(MirrorOutcome {
            status: status.as_u16(),
            transferred: true,
        })
    }
}

fn io_error(operation: &str, path: &Path, source: io::Error) -> PandoclabError {
    PandoclabError::IoError {
        operation: operation.to_string(),
        path: path.to_path_buf(),
        source,
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok().filter(|m| m.is_file())?.modified().ok()
}

fn set_modified_time(path: &Path, time: SystemTime) -> io::Result<()> {
    fs::File::options().write(true).open(path)?.set_modified(time)
}

/// Formats a time as an RFC 7231 HTTP date
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Parses an RFC 7231 HTTP date
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|date| SystemTime::from(date.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client() -> GithubClient {
        GithubClient::new(Duration::from_secs(10), None).unwrap()
    }

    #[test]
    fn test_http_date_round_trip() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_445_412_480);
        let formatted = http_date(time);
        assert_eq!(formatted, "Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_http_date(&formatted), Some(time));
    }

    #[test]
    fn test_parse_http_date_invalid() {
        assert_eq!(parse_http_date("yesterday"), None);
    }

    #[test]
    fn test_get_collects_headers() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/releases")
            .match_header("accept", GITHUB_JSON)
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_header("link", "<https://example.com/releases?page=2>; rel=\"next\"")
            .with_body("[]")
            .create();

        let response = client().get(&format!("{}/releases", server.url())).unwrap();

        mock.assert();
        assert!(response.is_success());
        assert_eq!(response.body, b"[]");
        assert_eq!(
            response.header("Link"),
            Some("<https://example.com/releases?page=2>; rel=\"next\"")
        );
    }

    #[test]
    fn test_get_sends_token() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/releases")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_body("[]")
            .create();

        let client = GithubClient::new(Duration::from_secs(10), Some("secret".to_string())).unwrap();
        client.get(&format!("{}/releases", server.url())).unwrap();

        mock.assert();
    }

    #[test]
    fn test_get_non_success_is_response() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/missing").with_status(404).create();

        let response = client().get(&format!("{}/missing", server.url())).unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[test]
    fn test_get_transport_failure() {
        // Port 9 (discard) is not listening on test machines
        let err = client().get("http://127.0.0.1:9/releases").unwrap_err();
        match err {
            PandoclabError::FetchFailed { url, .. } => assert_eq!(url, "http://127.0.0.1:9/releases"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_mirror_downloads_then_skips_unchanged() {
        let mut server = Server::new();
        let full = server
            .mock("GET", "/pandoc.deb")
            .match_header("if-modified-since", Matcher::Missing)
            .with_status(200)
            .with_header("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT")
            .with_body("package bytes")
            .expect(1)
            .create();
        let conditional = server
            .mock("GET", "/pandoc.deb")
            .match_header("if-modified-since", "Wed, 21 Oct 2015 07:28:00 GMT")
            .with_status(304)
            .expect(1)
            .create();

        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("pandoc.deb");
        let url = format!("{}/pandoc.deb", server.url());

        let first = client().mirror(&url, &dest).unwrap();
        assert!(first.is_success());
        assert!(first.transferred);
        assert_eq!(fs::read(&dest).unwrap(), b"package bytes");

        let second = client().mirror(&url, &dest).unwrap();
        assert!(second.is_success());
        assert!(!second.transferred);
        assert_eq!(second.status, 304);
        assert_eq!(fs::read(&dest).unwrap(), b"package bytes");

        full.assert();
        conditional.assert();
    }

    #[test]
    fn test_mirror_failure_status_leaves_destination_alone() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/gone.deb").with_status(404).create();

        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("gone.deb");

        let outcome = client()
            .mirror(&format!("{}/gone.deb", server.url()), &dest)
            .unwrap();

        assert!(!outcome.is_success());
        assert!(!outcome.transferred);
        assert!(!dest.exists());
    }
}
