//! Ordering and range properties of pandoclab_core::version

use pandoclab_core::version::{Version, VersionRange, compare};
use std::cmp::Ordering;

fn v(text: &str) -> Version {
    text.parse().unwrap()
}

#[test]
fn test_trailing_zero_equivalence() {
    assert_eq!(compare(&v("1.2"), &v("1.2.0")), Ordering::Equal);

    let exact: VersionRange = "==1.2".parse().unwrap();
    assert!(exact.satisfies(&v("1.2.0")));
    assert!(exact.satisfies(&v("1.2")));
    assert!(!exact.satisfies(&v("1.3")));
}

#[test]
fn test_sorting_pandoc_versions() {
    let mut versions: Vec<Version> = ["2.0", "1.19.2.4", "3.1.11.1", "1.19.2", "2.0.0.1", "1.9"]
        .iter()
        .map(|s| v(s))
        .collect();
    versions.sort();

    let sorted: Vec<String> = versions.iter().map(ToString::to_string).collect();
    assert_eq!(
        sorted,
        vec!["1.9", "1.19.2", "1.19.2.4", "2.0", "2.0.0.1", "3.1.11.1"]
    );
}

#[test]
fn test_range_excluding_known_release() {
    let range: VersionRange = "!=1.16, <=1.17".parse().unwrap();
    let accepted: Vec<&str> = ["1.15", "1.16", "1.16.0.1", "1.17", "1.17.0.1", "1.18"]
        .into_iter()
        .filter(|s| range.satisfies(&v(s)))
        .collect();
    assert_eq!(accepted, vec!["1.15", "1.16.0.1", "1.17"]);
}

#[test]
fn test_range_round_trips_through_display() {
    let range: VersionRange = ">= v1.12 , < 2".parse().unwrap();
    let again: VersionRange = range.to_string().parse().unwrap();
    assert_eq!(range, again);
}

#[test]
fn test_parse_error_message_names_input() {
    let err = Version::parse("1.x").unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("PARSE_ERROR"));
    assert!(message.contains("1.x"));
}
