//! Nest events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! observe what the nest does with topics and clients.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Nest::insert_client` (topic created, client inserted,
//!   insert rejected) and `Nest::msg_subscribers` (write failed, client evicted).
//! - **Consumers**: anything holding a receiver from `Nest::subscribe()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
