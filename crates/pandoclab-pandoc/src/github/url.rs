//! URL helpers for the releases API

use pandoclab_core::{PandoclabError, Result};
use url::Url;

/// Builds `{api_url}/tags/{tag}`
///
/// The tag is added as an encoded path segment, so it cannot escape the
/// releases collection.
///
/// # Errors
///
/// Returns `ConfigError` if `api_url` is not an absolute http(s) URL
pub fn release_tag_url(api_url: &str, tag: &str) -> Result<String> {
    let mut url = Url::parse(api_url)
        .map_err(|e| PandoclabError::ConfigError(format!("invalid API URL '{}': {}", api_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| PandoclabError::ConfigError(format!("API URL cannot be a base: {}", api_url)))?
        .pop_if_empty()
        .extend(["tags", tag]);

    Ok(url.into())
}

/// Extracts the `rel="next"` target from a `Link` header
///
/// ```
/// use pandoclab_pandoc::github::next_link;
///
/// let header = r#"<https://api.github.com/r?page=2>; rel="next", <https://api.github.com/r?page=9>; rel="last""#;
/// assert_eq!(next_link(header).as_deref(), Some("https://api.github.com/r?page=2"));
/// ```
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim();
        let target = target.strip_prefix('<')?.strip_suffix('>')?;

        let is_next = parts.any(|param| {
            let Some((key, value)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        });

        is_next.then(|| target.to_string())
    })
}
