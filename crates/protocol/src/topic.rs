//! Topic identification types
//!
//! `Topic` is the routing key that groups facts into logical streams.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Routing key identifying a logical stream of facts
///
/// Topics are opaque strings. Batchers buffer facts per topic and durable
/// sinks usually map a topic onto a table or file name.
///
/// # Example
///
/// ```
/// use flow_protocol::Topic;
///
/// let topic = Topic::new("page_views");
/// assert_eq!(topic.as_str(), "page_views");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Create a new topic
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the topic as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Topic {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Topic {
    fn borrow(&self) -> &str {
        &self.0
    }
}
