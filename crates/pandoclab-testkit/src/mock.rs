//! Mock server infrastructure for testing
//!
//! A single shared mockito server serves all tests of a test binary. Tests
//! keep apart by mocking distinct paths.

use lazy_static::lazy_static;
use mockito::{Server, ServerGuard};
use serde_json::{Value, json};
use std::sync::Mutex;

lazy_static! {
    /// Global shared mockito server for all tests
    pub static ref SHARED_MOCK_SERVER: Mutex<ServerGuard> = Mutex::new(Server::new());
}

/// Get reference to shared mock server
///
/// Acquire the lock only while creating mocks, not for the whole test:
///
/// ```no_run
/// use pandoclab_testkit::get_shared_mock_server;
///
/// let (mock, url) = {
///     let mut server = get_shared_mock_server();
///     let mock = server
///         .mock("GET", "/unique-path/releases")
///         .with_status(200)
///         .with_body("[]")
///         .create();
///     (mock, format!("{}/unique-path/releases", server.url()))
/// }; // Lock released here
/// ```
pub fn get_shared_mock_server() -> std::sync::MutexGuard<'static, ServerGuard> {
    SHARED_MOCK_SERVER.lock().unwrap_or_else(|poisoned| {
        // Mockito server remains functional after panic
        poisoned.into_inner()
    })
}

/// Release object as returned by the GitHub API
///
/// Each asset name gets a download URL under `download_base`.
pub fn release_json(tag: &str, assets: &[&str], download_base: &str) -> Value {
    let assets: Vec<Value> = assets
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "browser_download_url": format!("{}/{}/{}", download_base, tag, name),
            })
        })
        .collect();

    json!({
        "tag_name": tag,
        "name": format!("pandoc {}", tag),
        "assets": assets,
    })
}
