//! meowbot client library entry.
//!
//! Wires the transport seam, connection state machine, dispatcher and reply
//! actions into [`MeowClient`]. Intended to be embedded by bot processes and
//! exercised by the integration tests.

pub mod actions;
pub mod client;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod transport;

pub use client::MeowClient;
pub use connection::ConnectionState;
pub use dispatch::{Category, SubscriptionHandle};
pub use transport::{Transport, TransportEvent};
