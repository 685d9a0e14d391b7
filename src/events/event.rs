//! # Nest events emitted by the registry and broadcaster.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Registry events**: topic creation, client insertion and rejected insertion
//! - **Delivery events**: write failures and evictions during a broadcast
//!
//! The [`Event`] struct carries additional metadata such as timestamps, topic,
//! client id, reasons and error counts.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use chirp::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ClientEvicted)
//!     .with_topic("news")
//!     .with_client("reader-1")
//!     .with_errors(6);
//!
//! assert_eq!(ev.kind, EventKind::ClientEvicted);
//! assert_eq!(ev.topic.as_deref(), Some("news"));
//! assert_eq!(ev.errors, Some(6));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of nest events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Registry events ===
    /// A topic received its first client and now exists.
    ///
    /// Sets:
    /// - `topic`: topic name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TopicCreated,

    /// A client was appended to a topic's subscriber set.
    ///
    /// Sets:
    /// - `topic`: topic name
    /// - `client`: client id
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ClientInserted,

    /// Insert was refused because the client already failed.
    ///
    /// Sets:
    /// - `topic`: topic name
    /// - `client`: client id
    /// - `reason`: error label
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    InsertRejected,

    // === Delivery events ===
    /// A client's sink rejected a broadcast payload.
    ///
    /// Sets:
    /// - `topic`: topic name
    /// - `client`: client id
    /// - `reason`: failure message
    /// - `errors`: client error count after this failure
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    WriteFailed,

    /// A client exceeded its error tolerance and was removed from a topic.
    ///
    /// Sets:
    /// - `topic`: topic name
    /// - `client`: client id
    /// - `errors`: client error count at eviction
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ClientEvicted,
}

/// Nest event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Topic the event refers to.
    pub topic: Option<Arc<str>>,
    /// Caller-assigned id of the client involved.
    pub client: Option<Arc<str>>,
    /// Human-readable reason (failure message, error label).
    pub reason: Option<Arc<str>>,
    /// Accumulated error count of the client.
    pub errors: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            topic: None,
            client: None,
            reason: None,
            errors: None,
        }
    }

    /// Attaches a topic name.
    #[inline]
    pub fn with_topic(mut self, topic: impl Into<Arc<str>>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Attaches a client id.
    #[inline]
    pub fn with_client(mut self, client: impl Into<Arc<str>>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the client's error count.
    #[inline]
    pub fn with_errors(mut self, n: usize) -> Self {
        self.errors = Some(n);
        self
    }

    #[inline]
    pub fn is_eviction(&self) -> bool {
        matches!(self.kind, EventKind::ClientEvicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::TopicCreated);
        let b = Event::new(EventKind::TopicCreated);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builder_sets_fields() {
        let ev = Event::new(EventKind::WriteFailed)
            .with_topic("t")
            .with_client("c")
            .with_reason("sink closed")
            .with_errors(2);
        assert_eq!(ev.client.as_deref(), Some("c"));
        assert_eq!(ev.reason.as_deref(), Some("sink closed"));
        assert_eq!(ev.errors, Some(2));
        assert!(!ev.is_eviction());
    }
}
