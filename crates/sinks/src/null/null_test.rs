//! Tests for the null sink

use std::sync::Arc;
use std::time::Duration;

use flow_protocol::{Fact, Heartbeat, Step, Topic, TransformExt};
use flow_transform::BatchTransform;

use super::{MetricsSnapshot, NullSink, NullSinkMetrics};

fn facts(n: usize) -> Vec<Fact> {
    (0..n).map(|i| Fact::new(format!("test message {i}"))).collect()
}

// ============================================================================
// Metrics Tests
// ============================================================================

#[test]
fn test_metrics_new() {
    let metrics = NullSinkMetrics::new();
    assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
}

#[test]
fn test_metrics_record_write() {
    let metrics = NullSinkMetrics::new();

    metrics.record_write(100);
    metrics.record_write(200);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.writes_received, 2);
    assert_eq!(snapshot.facts_received, 300);
}

#[test]
fn test_metrics_reset() {
    let metrics = NullSinkMetrics::new();

    metrics.record_write(100);
    metrics.record_heartbeat();
    metrics.reset();

    assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
}

// ============================================================================
// Sink Tests
// ============================================================================

#[tokio::test]
async fn test_null_sink_counts_writes() {
    let sink = NullSink::new();

    sink.write(&Topic::new("a"), &facts(10)).await.unwrap();
    sink.write(&Topic::new("b"), &facts(20)).await.unwrap();

    let snapshot = sink.metrics().snapshot();
    assert_eq!(snapshot.writes_received, 2);
    assert_eq!(snapshot.facts_received, 30);
}

#[tokio::test]
async fn test_null_sink_accepts_empty_write() {
    let sink = NullSink::new();
    sink.write(&Topic::new("a"), &[]).await.unwrap();
    assert_eq!(sink.metrics().snapshot().facts_received, 0);
}

#[tokio::test]
async fn test_null_sink_counts_heartbeats() {
    let sink = NullSink::new();
    sink.heartbeat().await;
    sink.heartbeat().await;
    assert_eq!(sink.metrics().snapshot().heartbeats, 2);
}

#[tokio::test]
async fn test_null_sink_terminates_batcher() {
    let batcher = BatchTransform::new("a", 2, Duration::from_secs(60));
    let sink = batcher.then(Arc::new(NullSink::new()));

    batcher.write(&Topic::new("a"), &facts(3)).await.unwrap();

    let snapshot = sink.metrics().snapshot();
    assert_eq!(snapshot.writes_received, 1);
    assert_eq!(snapshot.facts_received, 3);
}

#[test]
fn test_name() {
    assert_eq!(NullSink::new().name(), "null");
    assert_eq!(NullSink::with_name("bench").name(), "bench");
}
