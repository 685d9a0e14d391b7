//! # chirp
//!
//! **chirp** is an in-process topic broadcaster for Rust.
//!
//! Callers register clients under named topics and publish a byte payload to
//! every client of a topic in one call. Delivery is best-effort: a client whose
//! sink keeps failing is tolerated up to a threshold, then evicted for good.
//! There is no network protocol and nothing is persisted.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    Client    │   │    Client    │   │    Client    │
//!     │ (sink + log) │   │ (sink + log) │   │ (sink + log) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ insert_client    ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Nest (topic registry + broadcaster)                              │
//! │  - RwLock<HashMap<topic, SubscriberSet>>  (registry lock)         │
//! │  - SubscriberSet: Mutex<Vec<ClientRef>>   (per-topic lock)        │
//! │  - Settings (error tolerance)                                     │
//! │  - Bus (broadcast of nest events)                                 │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        │ msg_subscribers(topic, payload, ignore)
//!        ▼                  ▼                  ▼
//!   client.write()     client.write()     client.write()
//!   (client lock)      (client lock)      (client lock)
//!        │                  │                  │
//!        └──── errors > tolerance ─► evict (swap-remove) ─► Failed
//! ```
//!
//! ### Client lifecycle
//! ```text
//! Client::new ──► Inactive ──insert_client──► Active ──evicted──► Failed
//!                                                 ▲   │
//!                                                 └───┘ insert into more topics
//!
//! insert_client(Failed) ─► NestError::InsertFailedClient
//! ```
//!
//! ## Features
//! | Area          | Description                                            | Key types / traits                  |
//! |---------------|--------------------------------------------------------|-------------------------------------|
//! | **Registry**  | Lazily created topics, concurrent inserts.             | [`Nest`], [`NestBuilder`]           |
//! | **Clients**   | Subscriber handles with an explicit state machine.     | [`Client`], [`ClientRef`], [`ClientState`] |
//! | **Sinks**     | Caller-supplied write capability.                      | [`Sink`], [`ChannelSink`]           |
//! | **Events**    | Observe inserts, failures and evictions.               | [`Event`], [`EventKind`]            |
//! | **Errors**    | Typed errors for registry and writes.                  | [`NestError`], [`WriteError`], [`SinkError`] |
//! | **Settings**  | Error tolerance and bus capacity.                      | [`Settings`]                        |
//!
//! ## Example
//! ```rust
//! use chirp::{ChannelSink, Client, Nest, Settings};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let nest = Nest::builder(Settings::default()).build();
//!
//!     let (sink, mut rx) = ChannelSink::new(16);
//!     let alice = Client::new("alice").with_sink(sink).shared();
//!     let bob = nest.new_client("chat", "bob", ChannelSink::new(16).0).await?;
//!
//!     nest.insert_client("chat", &alice).await?;
//!
//!     // Bob sent the message, so he does not get it back.
//!     nest.msg_subscribers("chat", b"hi alice", &[bob]).await?;
//!     assert_eq!(&*rx.recv().await.unwrap(), b"hi alice");
//!     Ok(())
//! }
//! ```
mod clients;
mod core;
mod error;
mod events;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use clients::{ChannelSink, Client, ClientRef, ClientState, Failure, Sink};
pub use crate::core::{Nest, NestBuilder, Settings};
pub use error::{NestError, SinkError, WriteError};
pub use events::{Event, EventKind};
