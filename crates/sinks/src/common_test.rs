//! Tests for common sink types

use crate::table::StoreError;
use crate::{SinkError, SinkMetrics};

#[test]
fn test_metrics_new() {
    let metrics = SinkMetrics::new();
    let snapshot = metrics.snapshot();

    assert_eq!(snapshot.writes_received, 0);
    assert_eq!(snapshot.writes_completed, 0);
    assert_eq!(snapshot.facts_written, 0);
    assert_eq!(snapshot.write_errors, 0);
}

#[test]
fn test_metrics_write_tracking() {
    let metrics = SinkMetrics::new();

    metrics.write_received();
    metrics.write_received();
    metrics.write_completed(100);
    metrics.write_error();

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.writes_received, 2);
    assert_eq!(snapshot.writes_completed, 1);
    assert_eq!(snapshot.facts_written, 100);
    assert_eq!(snapshot.write_errors, 1);
}

#[test]
fn test_metrics_reset() {
    let metrics = SinkMetrics::new();
    metrics.write_received();
    metrics.write_completed(7);

    metrics.reset();
    assert_eq!(metrics.snapshot(), Default::default());
}

#[test]
fn test_error_display() {
    let err = SinkError::from(StoreError::TableNotFound("orders".into()));
    assert_eq!(err.to_string(), "store error: table 'orders' not found");

    let err = SinkError::from(std::io::Error::other("disk gone"));
    assert_eq!(err.to_string(), "I/O error: disk gone");
}

#[test]
fn test_into_step_error() {
    let err = SinkError::from(StoreError::TableNotFound("orders".into())).into_step("table");
    assert!(!err.is_not_connected());
    assert_eq!(
        err.to_string(),
        "table write failed: store error: table 'orders' not found"
    );
}
