//! Error types used by the nest and its clients.
//!
//! This module defines three error enums:
//!
//! - [`NestError`] — registry-shape errors returned by [`Nest`](crate::Nest) operations.
//! - [`WriteError`] — errors returned by [`Client::write`](crate::Client::write).
//! - [`SinkError`] — failures reported by a [`Sink`](crate::Sink) implementation.
//!
//! All of them provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::sync::Arc;

use thiserror::Error;

/// # Errors produced by the nest.
///
/// These are fail-fast, local checks: when one is returned, nothing was mutated.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NestError {
    /// Publish to a topic that never had a client inserted.
    #[error("topic {topic:?} does not exist")]
    NoTopic {
        /// The requested topic name.
        topic: String,
    },

    /// Insert of a client that was already evicted for exceeding its error tolerance.
    ///
    /// Failed clients are never reinserted; build a fresh client instead.
    #[error("client {id:?} failed and cannot be inserted again")]
    InsertFailedClient {
        /// Caller-assigned id of the rejected client.
        id: String,
    },
}

impl NestError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use chirp::NestError;
    ///
    /// let err = NestError::NoTopic { topic: "news".into() };
    /// assert_eq!(err.as_label(), "nest_no_topic");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            NestError::NoTopic { .. } => "nest_no_topic",
            NestError::InsertFailedClient { .. } => "nest_insert_failed_client",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            NestError::NoTopic { topic } => format!("no topic: {topic}"),
            NestError::InsertFailedClient { id } => format!("failed client: {id}"),
        }
    }
}

/// # Errors produced by a single client write.
///
/// Returned to direct callers of [`Client::write`](crate::Client::write).
/// During a broadcast these are absorbed into the client's failure log.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum WriteError {
    /// The client has no sink attached.
    #[error("client has no writer")]
    NoWriter,

    /// The sink rejected the payload.
    #[error("sink write failed: {0}")]
    Sink(#[from] SinkError),
}

impl WriteError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            WriteError::NoWriter => "write_no_writer",
            WriteError::Sink(_) => "write_sink_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WriteError::NoWriter => "no writer".to_string(),
            WriteError::Sink(err) => format!("sink: {}", err.as_message()),
        }
    }
}

/// # Failures reported by a sink.
///
/// The nest treats every variant identically: one failure is one entry in the
/// client's failure log. The variants only exist to keep logs readable.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum SinkError {
    /// The destination is gone (connection closed, receiver dropped).
    #[error("sink closed")]
    Closed,

    /// The destination cannot accept more data right now.
    #[error("sink full")]
    Full,

    /// An I/O error from the underlying writer.
    #[error("io error: {0}")]
    Io(Arc<std::io::Error>),

    /// Any other failure.
    #[error("{error}")]
    Other {
        /// The underlying error message.
        error: String,
    },
}

impl SinkError {
    /// Convenience constructor for [`SinkError::Other`].
    pub fn other(error: impl Into<String>) -> Self {
        SinkError::Other {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SinkError::Closed => "sink_closed",
            SinkError::Full => "sink_full",
            SinkError::Io(_) => "sink_io",
            SinkError::Other { .. } => "sink_other",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SinkError::Closed => "closed".to_string(),
            SinkError::Full => "full".to_string(),
            SinkError::Io(err) => format!("io: {err}"),
            SinkError::Other { error } => format!("error: {error}"),
        }
    }
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::Io(Arc::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(
            NestError::InsertFailedClient { id: "a".into() }.as_label(),
            "nest_insert_failed_client"
        );
        assert_eq!(WriteError::NoWriter.as_label(), "write_no_writer");
        assert_eq!(
            WriteError::from(SinkError::Full).as_label(),
            "write_sink_failed"
        );
    }

    #[test]
    fn test_io_error_converts_into_sink_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe gone");
        let err = SinkError::from(io);
        assert_eq!(err.as_label(), "sink_io");
        assert!(err.as_message().contains("pipe gone"));
    }

    #[test]
    fn test_messages_include_details() {
        let err = NestError::NoTopic {
            topic: "weather".into(),
        };
        assert_eq!(err.as_message(), "no topic: weather");
        assert_eq!(err.to_string(), "topic \"weather\" does not exist");
        assert_eq!(SinkError::other("boom").to_string(), "boom");
    }
}
