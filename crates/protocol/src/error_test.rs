//! Tests for step error types

use crate::error::StepError;

#[test]
fn test_error_creation() {
    let err = StepError::not_connected("batch");
    assert!(err.is_not_connected());

    let err = StepError::downstream("table", "boom");
    assert!(matches!(err, StepError::Downstream { .. }));
    assert!(!err.is_not_connected());
}

#[test]
fn test_error_display() {
    let err = StepError::not_connected("batch");
    assert_eq!(err.to_string(), "batch has no downstream step");

    let err = StepError::downstream("table", "quota exceeded");
    assert_eq!(err.to_string(), "table write failed: quota exceeded");
}

#[test]
fn test_downstream_keeps_source() {
    use std::error::Error;

    let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
    let err = StepError::downstream("stdout", io);
    let source = err.source().expect("source should be preserved");
    assert!(source.to_string().contains("pipe closed"));
}
