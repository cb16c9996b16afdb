//! Top-level facade crate for meowbot.
//!
//! Re-exports the protocol core and the client library so bots can depend on
//! a single crate.

pub mod core {
    pub use meowbot_core::*;
}

pub mod client {
    pub use meowbot_client::*;
}

pub use meowbot_client::{Category, ConnectionState, MeowClient, Transport, TransportEvent};
pub use meowbot_core::protocol::{Decision, Event, EventPayload, EventTag, Notification};
pub use meowbot_core::{MeowError, Result};
