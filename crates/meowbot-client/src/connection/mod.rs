//! Connection lifecycle.
//!
//! `state` holds the pure state machine; side effects (transport calls,
//! reconnect tasks, logs) are driven by the client from its outcomes.

mod state;

pub use state::{ConnectionState, ConnectionStateMachine, DisconnectOutcome, PingOutcome};
