//! Clients and the sinks they write to.
//!
//! - [`Client`] / [`ClientRef`]: a subscriber, its lifecycle and failure log.
//! - [`Sink`]: the write capability supplied by the caller.
//! - [`ChannelSink`]: ready-made sink over a bounded mpsc queue.

mod client;
mod sink;

pub(crate) use client::Delivery;
pub use client::{Client, ClientRef, ClientState, Failure};
pub use sink::{ChannelSink, Sink};
