//! Stdout Sink - Human-readable debug output
//!
//! Writes one JSON line per fact. Payloads are rendered as UTF-8 text, with
//! invalid sequences replaced. Not intended for production use at high
//! throughput.
//!
//! # Example Output
//!
//! ```text
//! {"topic":"orders","_factId":"f-1","_transactionId":null,"_data":"{\"total\":12}","_timestamp":"2024-05-01T07:34:59.161Z"}
//! ```

use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use flow_protocol::{Fact, Heartbeat, Step, StepError, Topic, async_trait};
use parking_lot::Mutex;
use serde::Serialize;

use crate::common::SinkError;

/// Configuration for stdout sink
#[derive(Debug, Clone, Default)]
pub struct StdoutConfig {
    /// Maximum facts to print per write (0 = all)
    pub max_facts: usize,

    /// Pretty-print each fact across several lines
    pub pretty: bool,
}

impl StdoutConfig {
    /// Limit the facts printed per write
    pub fn with_max_facts(mut self, max: usize) -> Self {
        self.max_facts = max;
        self
    }

    /// Enable pretty-printed output
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

/// Stdout sink for debug output
///
/// Generic over the writer so tests and tools can capture output.
pub struct StdoutSink<W = io::Stdout> {
    writer: Mutex<W>,

    /// Configuration
    config: StdoutConfig,

    /// Metrics
    metrics: StdoutSinkMetrics,
}

/// One printed fact
#[derive(Serialize)]
struct Line<'a> {
    topic: &'a str,

    #[serde(rename = "_factId")]
    fact_id: &'a str,

    #[serde(rename = "_transactionId")]
    transaction_id: Option<&'a str>,

    #[serde(rename = "_data")]
    data: Cow<'a, str>,

    #[serde(rename = "_timestamp")]
    timestamp: DateTime<Utc>,
}

impl<'a> Line<'a> {
    fn new(topic: &'a Topic, fact: &'a Fact) -> Self {
        Self {
            topic: topic.as_str(),
            fact_id: &fact.fact_id,
            transaction_id: fact.transaction_id.as_deref(),
            data: String::from_utf8_lossy(&fact.data),
            timestamp: fact.timestamp,
        }
    }
}

// =============================================================================
// Metrics
// =============================================================================

/// Metrics for stdout sink
#[derive(Debug, Default)]
pub struct StdoutSinkMetrics {
    writes_received: AtomicU64,
    facts_printed: AtomicU64,
    bytes_printed: AtomicU64,
}

impl StdoutSinkMetrics {
    #[inline]
    pub const fn new() -> Self {
        Self {
            writes_received: AtomicU64::new(0),
            facts_printed: AtomicU64::new(0),
            bytes_printed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_write(&self, fact_count: u64, byte_count: u64) {
        self.writes_received.fetch_add(1, Ordering::Relaxed);
        self.facts_printed.fetch_add(fact_count, Ordering::Relaxed);
        self.bytes_printed.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            writes_received: self.writes_received.load(Ordering::Relaxed),
            facts_printed: self.facts_printed.load(Ordering::Relaxed),
            bytes_printed: self.bytes_printed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of stdout sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub writes_received: u64,
    pub facts_printed: u64,
    pub bytes_printed: u64,
}

// =============================================================================
// StdoutSink Implementation
// =============================================================================

impl StdoutSink {
    /// Create a new stdout sink with default config
    pub fn new() -> Self {
        Self::with_config(StdoutConfig::default())
    }

    /// Create a new stdout sink with custom config
    pub fn with_config(config: StdoutConfig) -> Self {
        Self::with_writer(io::stdout(), config)
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutSink<W> {
    /// Create a sink printing into `writer`
    pub fn with_writer(writer: W, config: StdoutConfig) -> Self {
        Self {
            writer: Mutex::new(writer),
            config,
            metrics: StdoutSinkMetrics::new(),
        }
    }

    /// Get reference to metrics
    #[inline]
    pub fn metrics(&self) -> &StdoutSinkMetrics {
        &self.metrics
    }

    /// Consume the sink and return its writer
    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }

    /// Render and print the facts of one write
    fn print(&self, topic: &Topic, facts: &[Fact]) -> Result<(), SinkError> {
        let max = if self.config.max_facts == 0 {
            facts.len()
        } else {
            self.config.max_facts.min(facts.len())
        };

        let mut out = Vec::new();
        for fact in &facts[..max] {
            let line = Line::new(topic, fact);
            if self.config.pretty {
                serde_json::to_writer_pretty(&mut out, &line)?;
            } else {
                serde_json::to_writer(&mut out, &line)?;
            }
            out.push(b'\n');
        }

        let mut writer = self.writer.lock();
        writer.write_all(&out)?;
        writer.flush()?;

        self.metrics.record_write(max as u64, out.len() as u64);
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> Heartbeat for StdoutSink<W> {
    async fn heartbeat(&self) {}
}

#[async_trait]
impl<W: Write + Send> Step for StdoutSink<W> {
    async fn write(&self, topic: &Topic, facts: &[Fact]) -> Result<(), StepError> {
        self.print(topic, facts).map_err(|e| e.into_step("stdout"))
    }
}

impl<W> std::fmt::Debug for StdoutSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdoutSink")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
#[path = "stdout_test.rs"]
mod stdout_test;
