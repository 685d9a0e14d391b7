//! # Client: one subscriber, its sink and its failure history.
//!
//! A client moves through three states:
//! ```text
//!   Inactive ──insert_client──► Active ──eviction──► Failed (terminal)
//!                                 │ ▲
//!                                 └─┘ insert into another topic
//! ```
//!
//! ## Rules
//! - Identity is the handle ([`ClientRef`]), never the caller-assigned id.
//! - The per-client lock serializes writes, failure-log appends and state changes.
//! - The failure log only grows while the client is active.
//! - A failed client cannot be reactivated; build a new one.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::Mutex;

use crate::clients::Sink;
use crate::error::{NestError, SinkError, WriteError};

/// Shared handle to a client; the unit of identity inside the nest.
pub type ClientRef = Arc<Client>;

/// Lifecycle state of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientState {
    /// Constructed but never inserted into a topic.
    #[default]
    Inactive,
    /// Inserted into at least one topic and receiving broadcasts.
    Active,
    /// Evicted for exceeding the error tolerance. Terminal.
    Failed,
}

impl ClientState {
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, ClientState::Active)
    }

    #[inline]
    pub fn is_failed(self) -> bool {
        matches!(self, ClientState::Failed)
    }

    /// Inactive → Active, Active → Active. `None` for a failed client.
    fn activate(self) -> Option<Self> {
        match self {
            ClientState::Failed => None,
            ClientState::Inactive | ClientState::Active => Some(ClientState::Active),
        }
    }

    /// Active → Failed. An inactive client has nothing to fail and stays inactive.
    fn fail(self) -> Self {
        match self {
            ClientState::Inactive => ClientState::Inactive,
            ClientState::Active | ClientState::Failed => ClientState::Failed,
        }
    }
}

/// One recorded sink failure.
#[derive(Debug, Clone)]
pub struct Failure {
    /// Position in the failure log (starting from 1).
    pub seq: usize,
    /// Wall-clock timestamp of the failed write.
    pub at: SystemTime,
    /// Error reported by the sink.
    pub error: SinkError,
}

/// Outcome of one broadcast write, seen by the nest.
#[derive(Debug)]
pub(crate) enum Delivery {
    /// The client already failed; nothing was written.
    Skipped { errors: usize },
    /// The sink accepted the payload.
    Written { errors: usize },
    /// The write failed; `errors` includes this failure when it was logged.
    Rejected { error: WriteError, errors: usize },
}

impl Delivery {
    pub(crate) fn errors(&self) -> usize {
        match self {
            Delivery::Skipped { errors }
            | Delivery::Written { errors }
            | Delivery::Rejected { errors, .. } => *errors,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: ClientState,
    failures: Vec<Failure>,
}

/// A subscriber wrapping one sink.
///
/// Build it with [`Client::new`] plus the `with_*` helpers (or the `set_*`
/// setters while you still own it), then share it with [`Client::shared`].
///
/// # Example
/// ```
/// use chirp::{ChannelSink, Client};
///
/// let (sink, _rx) = ChannelSink::new(16);
/// let client = Client::new("reader-1").with_sink(sink).shared();
/// assert_eq!(client.id(), "reader-1");
/// ```
#[derive(Default)]
pub struct Client {
    id: String,
    sink: Option<Arc<dyn Sink>>,
    inner: Mutex<Inner>,
}

impl Client {
    /// Creates an inactive client without a sink.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Replaces the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attaches a sink.
    pub fn with_sink<S: Sink>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Attaches a sink that is already shared.
    pub fn with_shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    pub fn set_sink(&mut self, sink: Arc<dyn Sink>) -> &mut Self {
        self.sink = Some(sink);
        self
    }

    /// Wraps the client into the handle used by the nest.
    #[must_use]
    pub fn shared(self) -> ClientRef {
        Arc::new(self)
    }

    /// Caller-assigned id (not unique, not used for lookup).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// True if a sink is attached.
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> ClientState {
        self.inner.lock().await.state
    }

    pub async fn is_active(&self) -> bool {
        self.state().await.is_active()
    }

    /// Number of failed writes recorded since activation.
    pub async fn error_count(&self) -> usize {
        self.inner.lock().await.failures.len()
    }

    /// Snapshot of the failure log.
    pub async fn failures(&self) -> Vec<Failure> {
        self.inner.lock().await.failures.clone()
    }

    /// Writes `payload` to the sink under the client lock.
    ///
    /// ### Errors
    /// - [`WriteError::NoWriter`] if no sink is attached; nothing is logged.
    /// - [`WriteError::Sink`] if the sink fails; the failure is appended to the log.
    pub async fn write(&self, payload: &[u8]) -> Result<(), WriteError> {
        let sink = self.sink.as_ref().ok_or(WriteError::NoWriter)?;
        let mut inner = self.inner.lock().await;
        Self::write_locked(&**sink, &mut inner, payload).await
    }

    /// Broadcast write: like [`write`](Self::write) but skips failed clients
    /// and reports the error count observed under the same lock.
    pub(crate) async fn deliver(&self, payload: &[u8]) -> Delivery {
        let mut inner = self.inner.lock().await;
        if inner.state.is_failed() {
            return Delivery::Skipped {
                errors: inner.failures.len(),
            };
        }

        let res = match self.sink.as_ref() {
            Some(sink) => Self::write_locked(&**sink, &mut inner, payload).await,
            None => Err(WriteError::NoWriter),
        };
        let errors = inner.failures.len();
        match res {
            Ok(()) => Delivery::Written { errors },
            Err(error) => Delivery::Rejected { error, errors },
        }
    }

    async fn write_locked(
        sink: &dyn Sink,
        inner: &mut Inner,
        payload: &[u8],
    ) -> Result<(), WriteError> {
        if let Err(error) = sink.write(payload).await {
            let seq = inner.failures.len() + 1;
            inner.failures.push(Failure {
                seq,
                at: SystemTime::now(),
                error: error.clone(),
            });
            return Err(WriteError::Sink(error));
        }
        Ok(())
    }

    /// Inactive → Active (resetting the failure log) or Active → Active.
    ///
    /// Returns `true` if this call performed the activation.
    pub(crate) async fn activate(&self) -> Result<bool, NestError> {
        let mut inner = self.inner.lock().await;
        let prev = inner.state;
        match prev.activate() {
            Some(next) => {
                inner.state = next;
                if prev == ClientState::Inactive {
                    inner.failures.clear();
                    return Ok(true);
                }
                Ok(false)
            }
            None => Err(NestError::InsertFailedClient {
                id: self.id.clone(),
            }),
        }
    }

    /// Active → Failed. Returns the error count at the time of the transition.
    pub(crate) async fn fail(&self) -> usize {
        let mut inner = self.inner.lock().await;
        inner.state = inner.state.fail();
        inner.failures.len()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("id", &self.id)
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BufferSink, FailingSink};

    #[test]
    fn test_state_transitions() {
        assert_eq!(ClientState::Inactive.activate(), Some(ClientState::Active));
        assert_eq!(ClientState::Active.activate(), Some(ClientState::Active));
        assert_eq!(ClientState::Failed.activate(), None);

        assert_eq!(ClientState::Active.fail(), ClientState::Failed);
        assert_eq!(ClientState::Failed.fail(), ClientState::Failed);
        assert_eq!(ClientState::Inactive.fail(), ClientState::Inactive);
    }

    #[tokio::test]
    async fn test_write_without_sink_is_no_writer() {
        let client = Client::default();
        let err = client.write(b"can't write").await.unwrap_err();
        assert!(matches!(err, WriteError::NoWriter));
        assert_eq!(client.error_count().await, 0);
    }

    #[tokio::test]
    async fn test_write_reaches_sink() {
        let sink = BufferSink::new();
        let client = Client::new("c").with_shared_sink(sink.clone());
        client.write(b"12345").await.unwrap();
        assert_eq!(sink.contents(), b"12345");
        assert_eq!(client.error_count().await, 0);
    }

    #[tokio::test]
    async fn test_failed_writes_are_logged_in_order() {
        let client = Client::new("c").with_sink(FailingSink);
        for _ in 0..3 {
            let err = client.write(b"x").await.unwrap_err();
            assert!(matches!(err, WriteError::Sink(_)));
        }
        let failures = client.failures().await;
        let seqs: Vec<usize> = failures.iter().map(|f| f.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_activate_once_then_fail_is_terminal() {
        let client = Client::new("c").with_sink(FailingSink).shared();
        assert_eq!(client.state().await, ClientState::Inactive);

        assert!(client.activate().await.unwrap());
        assert!(!client.activate().await.unwrap());
        assert!(client.is_active().await);

        let _ = client.write(b"x").await;
        assert_eq!(client.fail().await, 1);
        assert_eq!(client.state().await, ClientState::Failed);

        let err = client.activate().await.unwrap_err();
        assert_eq!(err, NestError::InsertFailedClient { id: "c".into() });
    }

    #[tokio::test]
    async fn test_activation_clears_preinsert_failures() {
        let client = Client::new("c").with_sink(FailingSink);
        let _ = client.write(b"x").await;
        assert_eq!(client.error_count().await, 1);

        client.activate().await.unwrap();
        assert_eq!(client.error_count().await, 0);
    }

    #[tokio::test]
    async fn test_deliver_skips_failed_client() {
        let sink = BufferSink::new();
        let client = Client::new("c").with_shared_sink(sink.clone());
        client.activate().await.unwrap();
        client.fail().await;

        let delivery = client.deliver(b"late").await;
        assert!(matches!(delivery, Delivery::Skipped { errors: 0 }));
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn test_setters_before_sharing() {
        let mut client = Client::default();
        client.set_id("renamed").set_sink(BufferSink::new());
        assert_eq!(client.id(), "renamed");
        assert!(client.has_sink());
    }
}
