//! Unit tests for charm error types.

use std::error::Error as _;
use std::io;

use rstest::rstest;

use super::*;

#[rstest]
#[case::add_source(PackageOperation::AddSource, "add-source failed: bad url")]
#[case::update_index(PackageOperation::UpdateIndex, "update-index failed: bad url")]
#[case::install(PackageOperation::Install, "install failed: bad url")]
fn package_error_names_the_operation(#[case] operation: PackageOperation, #[case] expected: &str) {
    let error = PackageError::new(operation, "bad url");
    assert_eq!(error.to_string(), expected);
    assert_eq!(error.message(), "bad url");
    assert!(error.source().is_none());
}

#[test]
fn package_error_retains_source() {
    let error = PackageError::with_source(
        PackageOperation::Install,
        "dpkg lock held",
        io::Error::new(io::ErrorKind::WouldBlock, "locked"),
    );
    let source = error.source().expect("source retained");
    assert_eq!(source.to_string(), "locked");
}

#[test]
fn package_failures_are_fatal() {
    let error = CharmError::from(PackageError::new(PackageOperation::UpdateIndex, "timeout"));
    assert!(error.is_fatal());
    assert_eq!(
        error.to_string(),
        "fatal package failure: update-index failed: timeout"
    );
}

#[rstest]
#[case::duplicate(CharmError::DuplicateCheck { name: String::from("ceph") })]
#[case::empty(CharmError::EmptyCheckName)]
#[case::hook(CharmError::hook("config-changed", "render failed", io::Error::other("disk full")))]
fn other_failures_are_not_fatal(#[case] error: CharmError) {
    assert!(!error.is_fatal());
}

#[test]
fn hook_error_mentions_hook_name() {
    let error = CharmError::hook("config-changed", "render failed", io::Error::other("disk full"));
    assert_eq!(error.to_string(), "config-changed hook failed: render failed");
}
