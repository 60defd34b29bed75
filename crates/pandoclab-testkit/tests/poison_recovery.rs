//! Integration tests for mutex poison recovery
//!
//! These tests intentionally poison mutexes to verify recovery logic.
//! They run in a separate test binary to avoid contaminating unit tests.

use pandoclab_testkit::{ENV_LOCK, get_shared_mock_server, with_env_var};
use std::thread;

#[test]
fn test_with_env_var_recovers_from_poison() {
    let handle = thread::spawn(|| {
        let _guard = ENV_LOCK.lock().unwrap();
        panic!("Simulated panic to poison mutex");
    });
    let _ = handle.join();
    assert!(ENV_LOCK.is_poisoned());

    let value = with_env_var("PANDOCLAB_POISON_PROBE", Some("ok"), || {
        std::env::var("PANDOCLAB_POISON_PROBE").unwrap()
    });
    assert_eq!(value, "ok");
}

#[test]
fn test_with_env_var_restores_after_panic() {
    let key = "PANDOCLAB_PANIC_PROBE";

    let result = std::panic::catch_unwind(|| {
        with_env_var(key, Some("temporary"), || panic!("inside closure"));
    });
    assert!(result.is_err());

    with_env_var("PANDOCLAB_UNRELATED", None, || {
        assert!(std::env::var(key).is_err());
    });
}

#[test]
fn test_mock_server_recovers_from_poison() {
    let handle = thread::spawn(|| {
        let _server = get_shared_mock_server();
        panic!("Simulated panic while holding server");
    });
    let _ = handle.join();

    let server = get_shared_mock_server();
    assert!(server.url().starts_with("http://"));
}
