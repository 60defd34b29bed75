//! Environment isolation utilities for testing
//!
//! Tests that read or modify process environment variables must hold
//! [`ENV_LOCK`] so parallel tests do not observe each other's values.

use std::sync::Mutex;

/// Static mutex to serialize tests that modify environment variables
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with `key` set to `value` (or removed for `None`)
///
/// The previous value is restored afterwards, also when `f` panics.
///
/// # Examples
///
/// ```no_run
/// use pandoclab_testkit::with_env_var;
///
/// with_env_var("PANDOC_PATH", Some("/opt/pandoc/bin/pandoc"), || {
///     assert_eq!(std::env::var("PANDOC_PATH").unwrap(), "/opt/pandoc/bin/pandoc");
/// });
/// ```
pub fn with_env_var<F, R>(key: &str, value: Option<&str>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| {
        // Recover from poisoned mutex
        // Environment variables remain valid after a panic
        poisoned.into_inner()
    });

    let _restore = Restore {
        key: key.to_string(),
        original: std::env::var(key).ok(),
    };

    // SAFETY: We hold ENV_LOCK, ensuring no other test is modifying env vars concurrently.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }

    f()
}

struct Restore {
    key: String,
    original: Option<String>,
}

impl Drop for Restore {
    fn drop(&mut self) {
        // SAFETY: Dropped before the ENV_LOCK guard, which is declared first.
        unsafe {
            match &self.original {
                Some(value) => std::env::set_var(&self.key, value),
                None => std::env::remove_var(&self.key),
            }
        }
    }
}
