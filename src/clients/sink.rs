//! # Sink abstraction and a channel-backed implementation.
//!
//! A [`Sink`] is whatever a client delivers payloads to: a socket, a file,
//! an in-memory buffer. The nest never constructs or closes sinks; it only
//! calls [`Sink::write`] and counts failures.
//!
//! [`ChannelSink`] forwards payloads into a bounded `tokio::sync::mpsc` queue,
//! for consumers that want to process messages on their own task.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::SinkError;

/// # Write capability of one subscriber.
///
/// Any error counts as one failure regardless of cause. A write that never
/// returns blocks the broadcast that issued it; wrap the sink with your own
/// timeout if that matters.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use chirp::{Sink, SinkError};
///
/// struct Stdout;
///
/// #[async_trait]
/// impl Sink for Stdout {
///     async fn write(&self, payload: &[u8]) -> Result<(), SinkError> {
///         println!("{}", String::from_utf8_lossy(payload));
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Sink: Send + Sync + 'static {
    /// Writes one payload.
    async fn write(&self, payload: &[u8]) -> Result<(), SinkError>;
}

/// Sink that forwards each payload into a bounded mpsc queue.
///
/// Uses `try_send`, so a slow consumer shows up as failures instead of
/// stalling the broadcast:
/// - queue full → [`SinkError::Full`]
/// - receiver dropped → [`SinkError::Closed`]
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: mpsc::Sender<Arc<[u8]>>,
}

impl ChannelSink {
    /// Creates a sink and its receiving half.
    ///
    /// The capacity is clamped to a minimum of 1.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Arc<[u8]>>) {
        let (sender, rx) = mpsc::channel(capacity.max(1));
        (Self { sender }, rx)
    }

    /// Wraps an existing sender.
    pub fn from_sender(sender: mpsc::Sender<Arc<[u8]>>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Sink for ChannelSink {
    async fn write(&self, payload: &[u8]) -> Result<(), SinkError> {
        match self.sender.try_send(Arc::from(payload)) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(SinkError::Full),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SinkError::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_forwards_payload() {
        let (sink, mut rx) = ChannelSink::new(4);
        sink.write(b"hello").await.unwrap();
        assert_eq!(&*rx.recv().await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_channel_sink_reports_full() {
        let (sink, _rx) = ChannelSink::new(1);
        sink.write(b"one").await.unwrap();
        let err = sink.write(b"two").await.unwrap_err();
        assert!(matches!(err, SinkError::Full));
    }

    #[tokio::test]
    async fn test_channel_sink_reports_closed() {
        let (sink, rx) = ChannelSink::new(1);
        drop(rx);
        let err = sink.write(b"lost").await.unwrap_err();
        assert!(matches!(err, SinkError::Closed));
    }
}
