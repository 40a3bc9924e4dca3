use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use flow_protocol::{
    CancellationToken, Fact, Heartbeat, RunOutcome, Runnable, Step, StepError, Topic, async_trait,
};
use parking_lot::Mutex;

use super::*;

#[derive(Default)]
struct MockStep {
    writes: Mutex<Vec<(Topic, usize)>>,
    heartbeats: AtomicUsize,
    fail: AtomicBool,
}

impl MockStep {
    fn writes(&self) -> Vec<(Topic, usize)> {
        self.writes.lock().clone()
    }
}

#[async_trait]
impl Heartbeat for MockStep {
    async fn heartbeat(&self) {
        self.heartbeats.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Step for MockStep {
    async fn write(&self, topic: &Topic, facts: &[Fact]) -> Result<(), StepError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StepError::downstream("mock", "boom"));
        }
        self.writes.lock().push((topic.clone(), facts.len()));
        Ok(())
    }
}

fn facts(n: usize) -> Vec<Fact> {
    (0..n).map(|i| Fact::new(format!("f{i}"))).collect()
}

#[tokio::test]
async fn test_run_forwards_queued_writes() {
    let (source, handle) = ChannelSource::new(ChannelSourceConfig::default());
    let sink = Arc::new(MockStep::default());
    source.connect(sink.clone());

    handle.send(Topic::new("a"), facts(2)).await.unwrap();
    handle.send(Topic::new("b"), facts(3)).await.unwrap();

    let outcome = source.run(&CancellationToken::new()).await;
    assert!(matches!(outcome, RunOutcome::Continue(d) if d == DEFAULT_POLL_INTERVAL));
    assert_eq!(
        sink.writes(),
        vec![(Topic::new("a"), 2), (Topic::new("b"), 3)]
    );

    let snapshot = source.metrics().snapshot();
    assert_eq!(snapshot.runs, 1);
    assert_eq!(snapshot.facts_forwarded, 5);
    assert_eq!(snapshot.errors, 0);
}

#[tokio::test]
async fn test_run_with_empty_queue_continues() {
    let config = ChannelSourceConfig::default().with_poll_interval(Duration::from_millis(5));
    let (source, _handle) = ChannelSource::new(config);
    source.connect(Arc::new(MockStep::default()));

    let outcome = source.run(&CancellationToken::new()).await;
    assert!(matches!(outcome, RunOutcome::Continue(d) if d == Duration::from_millis(5)));
}

#[tokio::test]
async fn test_run_respects_max_batches_per_run() {
    let config = ChannelSourceConfig::default().with_max_batches_per_run(2);
    let (source, handle) = ChannelSource::new(config);
    let sink = Arc::new(MockStep::default());
    source.connect(sink.clone());

    for _ in 0..3 {
        handle.send(Topic::new("a"), facts(1)).await.unwrap();
    }

    let outcome = source.run(&CancellationToken::new()).await;
    assert!(matches!(outcome, RunOutcome::Continue(d) if d.is_zero()));
    assert_eq!(sink.writes().len(), 2);

    let outcome = source.run(&CancellationToken::new()).await;
    assert!(matches!(outcome, RunOutcome::Continue(d) if d == DEFAULT_POLL_INTERVAL));
    assert_eq!(sink.writes().len(), 3);
}

#[tokio::test]
async fn test_run_terminates_when_all_handles_dropped() {
    let (source, handle) = ChannelSource::new(ChannelSourceConfig::default());
    let sink = Arc::new(MockStep::default());
    source.connect(sink.clone());

    handle.send(Topic::new("a"), facts(1)).await.unwrap();
    drop(handle);

    // Pending facts are still forwarded before terminating
    let outcome = source.run(&CancellationToken::new()).await;
    assert!(outcome.is_terminate());
    assert_eq!(sink.writes().len(), 1);
}

#[tokio::test]
async fn test_run_reports_downstream_failure() {
    let (source, handle) = ChannelSource::new(ChannelSourceConfig::default());
    let sink = Arc::new(MockStep::default());
    sink.fail.store(true, Ordering::SeqCst);
    source.connect(sink.clone());

    handle.send(Topic::new("a"), facts(1)).await.unwrap();

    let outcome = source.run(&CancellationToken::new()).await;
    match outcome {
        RunOutcome::Failed(err) => assert!(err.to_string().contains("'a'")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(source.metrics().snapshot().errors, 1);
}

#[tokio::test]
async fn test_run_unconnected_fails() {
    let (source, handle) = ChannelSource::new(ChannelSourceConfig::default());
    handle.send(Topic::new("a"), facts(1)).await.unwrap();

    let outcome = source.run(&CancellationToken::new()).await;
    assert!(matches!(outcome, RunOutcome::Failed(_)));
}

#[tokio::test]
async fn test_run_stops_draining_when_cancelled() {
    let (source, handle) = ChannelSource::new(ChannelSourceConfig::default());
    let sink = Arc::new(MockStep::default());
    source.connect(sink.clone());
    handle.send(Topic::new("a"), facts(1)).await.unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();

    source.run(&cancel).await;
    assert!(sink.writes().is_empty());
}

#[tokio::test]
async fn test_heartbeat_forwards() {
    let (source, _handle) = ChannelSource::new(ChannelSourceConfig::default());
    let sink = Arc::new(MockStep::default());
    source.connect(sink.clone());

    source.heartbeat().await;
    assert_eq!(sink.heartbeats.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_try_send_full_returns_facts() {
    let config = ChannelSourceConfig::default().with_channel_capacity(1);
    let (_source, handle) = ChannelSource::new(config);

    handle.try_send(Topic::new("a"), facts(1)).unwrap();
    let rejected = handle.try_send(Topic::new("a"), facts(2)).unwrap_err();
    assert_eq!(rejected.len(), 2);
}

#[tokio::test]
async fn test_handle_inactive_after_source_dropped() {
    let (source, handle) = ChannelSource::new(ChannelSourceConfig::default());
    assert!(handle.is_active());

    drop(source);
    assert!(!handle.is_active());
    assert!(handle.send(Topic::new("a"), facts(1)).await.is_err());
}

#[test]
fn test_debug_shows_wiring() {
    let (source, _handle) = ChannelSource::new(ChannelSourceConfig::default());
    let debug = format!("{source:?}");
    assert!(debug.contains("ChannelSource"));
    assert!(debug.contains("connected: false"));
}
