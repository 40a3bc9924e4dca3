//! Stdout sink tests

use chrono::{TimeZone, Utc};
use flow_protocol::{Fact, Step, Topic};

use super::{MetricsSnapshot, StdoutConfig, StdoutSink, StdoutSinkMetrics};

fn fact(id: &str, data: &[u8]) -> Fact {
    Fact::new(data.to_vec())
        .with_fact_id(id)
        .with_timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 7, 34, 59).unwrap())
}

fn captured(sink: StdoutSink<Vec<u8>>) -> Vec<serde_json::Value> {
    let out = String::from_utf8(sink.into_writer()).unwrap();
    out.lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// ============================================================================
// StdoutConfig Tests
// ============================================================================

#[test]
fn test_config_default() {
    let config = StdoutConfig::default();

    assert_eq!(config.max_facts, 0);
    assert!(!config.pretty);
}

#[test]
fn test_config_builders() {
    assert!(StdoutConfig::pretty().pretty);
    assert_eq!(StdoutConfig::default().with_max_facts(3).max_facts, 3);
}

// ============================================================================
// Metrics Tests
// ============================================================================

#[test]
fn test_metrics_record_write() {
    let metrics = StdoutSinkMetrics::new();
    metrics.record_write(2, 100);
    metrics.record_write(1, 50);

    assert_eq!(
        metrics.snapshot(),
        MetricsSnapshot {
            writes_received: 2,
            facts_printed: 3,
            bytes_printed: 150,
        }
    );
}

// ============================================================================
// Sink Tests
// ============================================================================

#[tokio::test]
async fn test_writes_one_json_line_per_fact() {
    let sink = StdoutSink::with_writer(Vec::new(), StdoutConfig::default());
    let facts = vec![
        fact("f-1", br#"{"total":12}"#),
        fact("f-2", b"plain").with_transaction_id("tx-9"),
    ];

    sink.write(&Topic::new("orders"), &facts).await.unwrap();

    let lines = captured(sink);
    assert_eq!(lines.len(), 2);

    assert_eq!(lines[0]["topic"], "orders");
    assert_eq!(lines[0]["_factId"], "f-1");
    assert_eq!(lines[0]["_transactionId"], serde_json::Value::Null);
    assert_eq!(lines[0]["_data"], r#"{"total":12}"#);
    assert_eq!(lines[0]["_timestamp"], "2024-05-01T07:34:59Z");

    assert_eq!(lines[1]["_transactionId"], "tx-9");
    assert_eq!(lines[1]["_data"], "plain");
}

#[tokio::test]
async fn test_invalid_utf8_is_replaced() {
    let sink = StdoutSink::with_writer(Vec::new(), StdoutConfig::default());

    sink.write(&Topic::new("raw"), &[fact("f-1", &[0x66, 0xff, 0x6f])])
        .await
        .unwrap();

    let lines = captured(sink);
    assert_eq!(lines[0]["_data"], "f\u{fffd}o");
}

#[tokio::test]
async fn test_max_facts_limits_output() {
    let sink = StdoutSink::with_writer(Vec::new(), StdoutConfig::default().with_max_facts(1));
    let facts = vec![fact("a", b"1"), fact("b", b"2"), fact("c", b"3")];

    sink.write(&Topic::new("t"), &facts).await.unwrap();
    assert_eq!(sink.metrics().snapshot().facts_printed, 1);

    let lines = captured(sink);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["_factId"], "a");
}

#[tokio::test]
async fn test_pretty_output_spans_lines() {
    let sink = StdoutSink::with_writer(Vec::new(), StdoutConfig::pretty());

    sink.write(&Topic::new("t"), &[fact("a", b"1")]).await.unwrap();

    let out = String::from_utf8(sink.into_writer()).unwrap();
    assert!(out.lines().count() > 1);
    assert!(out.contains("\"_factId\": \"a\""));
}

#[tokio::test]
async fn test_empty_write_prints_nothing() {
    let sink = StdoutSink::with_writer(Vec::new(), StdoutConfig::default());
    sink.write(&Topic::new("t"), &[]).await.unwrap();

    assert_eq!(sink.metrics().snapshot().writes_received, 1);
    assert!(sink.into_writer().is_empty());
}

#[tokio::test]
async fn test_writer_failure_is_downstream_error() {
    struct Broken;

    impl std::io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("pipe closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let sink = StdoutSink::with_writer(Broken, StdoutConfig::default());
    let err = sink
        .write(&Topic::new("t"), &[fact("a", b"1")])
        .await
        .unwrap_err();

    assert!(!err.is_not_connected());
    assert!(err.to_string().contains("pipe closed"));
}
