//! Dispatcher module exports.
//!
//! Re-exports the dispatcher and subscription types so downstream consumers
//! can depend on this module directly.

pub mod dispatcher;

pub use dispatcher::{Category, Dispatcher, Subscriber, SubscriptionHandle};
