//! Tests for the tracing subscriber setup.

use seqaudit_core::logging;

#[test]
fn test_init_installs_subscriber_once() {
    // The first call may lose to another test harness subscriber; the second
    // call must always report that a subscriber already exists.
    let _ = logging::init("info");
    assert!(!logging::init("debug"));
    tracing::info!(target: "seqaudit", "subscriber active");
}
