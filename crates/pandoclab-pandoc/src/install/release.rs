//! Release records parsed from the GitHub releases API
//!
//! A [`Release`] is an immutable snapshot of one API object. It is built once
//! by [`Release::from_json`] and never re-fetched.

use super::platform::asset_name_suffix;
use pandoclab_core::{PandoclabError, Result, Version};
use serde::Serialize;
use serde_json::Value;

/// One tagged pandoc release
#[derive(Debug, Clone, Serialize)]
pub struct Release {
    /// Release tag name (e.g., "2.19.2")
    pub tag_name: String,
    /// Version parsed from the tag
    pub version: Version,
    /// List of downloadable assets, in API order
    pub assets: Vec<Asset>,
    /// The API object this release was built from
    #[serde(skip)]
    pub raw: Value,
}

/// A downloadable file of a release
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Asset {
    /// Asset filename (e.g., "pandoc-2.19.2-1-amd64.deb")
    pub name: String,
    /// Direct download URL, when the API provides one
    pub download_url: Option<String>,
}

impl Release {
    /// Builds a release from one object of an API response
    ///
    /// A leading `v` on the tag is ignored when parsing the version.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if `tag_name` is missing or not a version, or an
    /// asset has no `name`.
    pub fn from_json(raw: Value) -> Result<Self> {
        let tag_name = raw
            .get("tag_name")
            .and_then(Value::as_str)
            .ok_or_else(|| PandoclabError::parse("release", &truncate(&raw), "missing tag_name"))?
            .to_string();

        let version = Version::parse(tag_name.strip_prefix('v').unwrap_or(&tag_name))?;

        let assets = match raw.get("assets") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| Asset::from_json(&tag_name, item))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(PandoclabError::parse(
                    "release",
                    &tag_name,
                    "assets is not an array",
                ));
            }
        };

        Ok(Self {
            tag_name,
            version,
            assets,
            raw,
        })
    }

    /// First asset named `*-{arch}.deb`
    pub fn deb_asset(&self, arch: &str) -> Option<&Asset> {
        let suffix = asset_name_suffix(arch);
        self.assets.iter().find(|asset| asset.name.ends_with(&suffix))
    }
}

impl Asset {
    fn from_json(tag: &str, raw: &Value) -> Result<Self> {
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| PandoclabError::parse("release", tag, "asset without name"))?
            .to_string();

        let download_url = raw
            .get("browser_download_url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(Self { name, download_url })
    }
}

fn truncate(raw: &Value) -> String {
    let mut text = raw.to_string();
    if text.len() > 80 {
        let mut end = 80;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push_str("...");
    }
    text
}
