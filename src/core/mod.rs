//! Nest core: topic registry, subscriber sets and broadcast.
//!
//! The public API from this module is [`Nest`], its [`Settings`] and the
//! [`NestBuilder`].
//!
//! Internal modules:
//! - [`nest`]: registry lock, insert, broadcast-with-eviction;
//! - [`subscriber_set`]: per-topic member list with swap-remove;
//! - [`config`]: immutable settings;
//! - [`builder`]: shared construction.

mod builder;
mod config;
mod nest;
mod subscriber_set;

pub use builder::NestBuilder;
pub use config::Settings;
pub use nest::Nest;
