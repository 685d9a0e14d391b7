//! # Nest - topic registry and broadcaster.
//!
//! The nest maps topic names to subscriber sets and fans payloads out to them.
//!
//! ## Architecture
//! ```text
//! insert_client(topic, client)
//!     ├─► client.activate()            (Failed → InsertFailedClient)
//!     ├─► registry lock: lookup / create topic
//!     └─► set lock: append client
//!
//! msg_subscribers(topic, payload, ignore)
//!     ├─► registry lock: lookup topic  (missing → NoTopic)
//!     ├─► set lock: snapshot members
//!     ├─► for each member not in `ignore`:
//!     │       client lock: write + log failure
//!     │       errors > tolerance → mark
//!     └─► set lock: swap-remove marked clients → Failed
//! ```
//!
//! ## Rules
//! - The registry lock is never held during writes or member iteration.
//! - Broadcasts iterate a snapshot: publishers to one topic never wait on each
//!   other's sinks, only on the short set lock.
//! - A client inserted during an in-flight broadcast is not part of it.
//! - A client evicted by a concurrent broadcast is skipped and its second
//!   removal is a no-op.
//! - Delivery failures never abort a sweep and are not returned to the publisher.
//! - Topics are created lazily and never removed.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use log::{debug, trace, warn};
use tokio::sync::{RwLock, broadcast};

use crate::clients::{Client, ClientRef, Delivery, Sink};
use crate::core::config::Settings;
use crate::core::subscriber_set::SubscriberSet;
use crate::error::NestError;
use crate::events::{Bus, Event, EventKind};

/// Topic registry and broadcaster.
///
/// Usually shared as `Arc<Nest>`; every method takes `&self`.
///
/// # Example
/// ```
/// use chirp::{ChannelSink, Client, Nest};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), chirp::NestError> {
/// let nest = Nest::default();
/// let (sink, mut rx) = ChannelSink::new(8);
/// let client = Client::new("reader").with_sink(sink).shared();
///
/// nest.insert_client("news", &client).await?;
/// nest.msg_subscribers("news", b"hello", &[]).await?;
///
/// assert_eq!(&*rx.recv().await.unwrap(), b"hello");
/// # Ok(())
/// # }
/// ```
pub struct Nest {
    topics: RwLock<HashMap<String, Arc<SubscriberSet>>>,
    settings: Settings,
    bus: Bus,
}

impl Nest {
    /// Creates an empty nest.
    pub fn new(settings: Settings) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            bus: Bus::new(settings.bus_capacity_clamped()),
            settings,
        }
    }

    /// Returns a builder for a shared nest.
    pub fn builder(settings: Settings) -> crate::core::NestBuilder {
        crate::core::NestBuilder::new(settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Receiver for nest events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Inserts `client` into `topic`, creating the topic if needed.
    ///
    /// An inactive client is activated first; an active one is inserted as is
    /// (the same client may live in many topics). Inserting a client that is
    /// already a member of `topic` is a no-op.
    ///
    /// ### Errors
    /// [`NestError::InsertFailedClient`] if the client was evicted before.
    /// Nothing is mutated in that case.
    pub async fn insert_client(&self, topic: &str, client: &ClientRef) -> Result<(), NestError> {
        if let Err(err) = client.activate().await {
            debug!("rejected insert of failed client {:?} into {topic:?}", client.id());
            self.bus.publish(
                Event::new(EventKind::InsertRejected)
                    .with_topic(topic)
                    .with_client(client.id())
                    .with_reason(err.as_label()),
            );
            return Err(err);
        }

        let set = self.topic_or_create(topic).await;
        if set.append(Arc::clone(client)).await {
            debug!("inserted client {:?} into {topic:?}", client.id());
            self.bus.publish(
                Event::new(EventKind::ClientInserted)
                    .with_topic(topic)
                    .with_client(client.id()),
            );
        }
        Ok(())
    }

    /// Builds a client around `sink`, inserts it into `topic` and returns its handle.
    pub async fn new_client<S: Sink>(
        &self,
        topic: &str,
        id: impl Into<String>,
        sink: S,
    ) -> Result<ClientRef, NestError> {
        let client = Client::new(id).with_sink(sink).shared();
        self.insert_client(topic, &client).await?;
        Ok(client)
    }

    /// Writes `payload` to every subscriber of `topic` except those in `ignore`.
    ///
    /// Delivery order is unspecified. Write failures are recorded on the client
    /// and never returned here; clients whose error count exceeds the configured
    /// tolerance are evicted after the sweep.
    ///
    /// ### Errors
    /// [`NestError::NoTopic`] if no client was ever inserted into `topic`.
    /// No writes happen in that case.
    pub async fn msg_subscribers(
        &self,
        topic: &str,
        payload: &[u8],
        ignore: &[ClientRef],
    ) -> Result<(), NestError> {
        let set = self.lookup(topic).await.ok_or_else(|| NestError::NoTopic {
            topic: topic.to_string(),
        })?;

        let mut to_evict: Vec<ClientRef> = Vec::new();
        for client in set.snapshot().await {
            if ignore.iter().any(|ign| Arc::ptr_eq(ign, &client)) {
                continue;
            }

            let delivery = client.deliver(payload).await;
            let errors = delivery.errors();
            let skipped = matches!(delivery, Delivery::Skipped { .. });
            if let Delivery::Rejected { error, .. } = delivery {
                trace!(
                    "write to client {:?} on {topic:?} failed ({errors} errors): {error}",
                    client.id()
                );
                self.bus.publish(
                    Event::new(EventKind::WriteFailed)
                        .with_topic(topic)
                        .with_client(client.id())
                        .with_reason(error.as_message())
                        .with_errors(errors),
                );
            }

            if skipped || self.settings.exceeds_tolerance(errors) {
                to_evict.push(client);
            }
        }

        for client in to_evict {
            if let Some(errors) = set.remove(&client).await {
                warn!(
                    "evicted client {:?} from {topic:?} after {errors} failed writes",
                    client.id()
                );
                self.bus.publish(
                    Event::new(EventKind::ClientEvicted)
                        .with_topic(topic)
                        .with_client(client.id())
                        .with_errors(errors),
                );
            }
        }
        Ok(())
    }

    /// Returns sorted list of topic names.
    pub async fn topics(&self) -> Vec<String> {
        let topics = self.topics.read().await;
        let mut names: Vec<String> = topics.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub async fn has_topic(&self, topic: &str) -> bool {
        self.topics.read().await.contains_key(topic)
    }

    /// Number of subscribers of `topic`, `None` if the topic does not exist.
    pub async fn subscriber_count(&self, topic: &str) -> Option<usize> {
        match self.lookup(topic).await {
            Some(set) => Some(set.len().await),
            None => None,
        }
    }

    /// True if `client` (by identity) is a member of `topic`.
    pub async fn is_subscribed(&self, topic: &str, client: &ClientRef) -> bool {
        match self.lookup(topic).await {
            Some(set) => set.contains(client).await,
            None => false,
        }
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    async fn lookup(&self, topic: &str) -> Option<Arc<SubscriberSet>> {
        self.topics.read().await.get(topic).cloned()
    }

    async fn topic_or_create(&self, topic: &str) -> Arc<SubscriberSet> {
        if let Some(set) = self.lookup(topic).await {
            return set;
        }

        let mut topics = self.topics.write().await;
        match topics.entry(topic.to_string()) {
            Entry::Occupied(e) => Arc::clone(e.get()),
            Entry::Vacant(e) => {
                debug!("created topic {topic:?}");
                self.bus
                    .publish(Event::new(EventKind::TopicCreated).with_topic(topic));
                Arc::clone(e.insert(Arc::new(SubscriberSet::new())))
            }
        }
    }
}

impl Default for Nest {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
