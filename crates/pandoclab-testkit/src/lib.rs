//! Test utilities for pandoclab
//!
//! This crate provides shared testing utilities used across the pandoclab workspace.

pub mod env;
pub mod fixtures;
pub mod mock;

pub use env::{ENV_LOCK, with_env_var};
pub use fixtures::{
    PANDOC_1_12_REPORT, PANDOC_2_19_REPORT, PANDOC_3_REPORT, deb_payload_tar, failing_dpkg,
    fake_dpkg, fake_pandoc, noisy_dpkg, write_executable,
};
pub use mock::{get_shared_mock_server, release_json};
