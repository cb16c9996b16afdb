//! Transport collaborator seam.
//!
//! The socket itself (framing, engine.io handshake, TLS) lives behind
//! [`Transport`]. The transport reports what happens on the wire by calling
//! [`MeowClient::notify`](crate::MeowClient::notify) with a [`TransportEvent`],
//! one at a time per connection.

use async_trait::async_trait;
use serde_json::Value;

use meowbot_core::error::Result;

/// Duplex connection to the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Backend address, for logs.
    fn uri(&self) -> &str;

    /// Open the connection. Completion is reported with
    /// [`TransportEvent::Connected`]; returning `Ok` only means the attempt
    /// was started.
    async fn connect(&self) -> Result<()>;

    /// Tear the connection down. Must tolerate being called while already
    /// disconnected.
    async fn disconnect(&self) -> Result<()>;

    /// Send a named message to the backend.
    async fn emit(&self, event: &str, payload: Value) -> Result<()>;
}

/// Notifications raised by the transport.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    Connected,
    Disconnected { reason: String },
    /// The transport's own reconnect loop is retrying.
    Reconnecting { attempt: u32 },
    Ping,
    Pong { elapsed_ms: u64 },
    Error { message: String },
    /// A frame on a named channel (`OnGroupMsgs`, `OnFriendMsgs`, `OnEvents`).
    Frame { channel: String, payload: Value },
}

impl TransportEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            TransportEvent::Connected => "connected",
            TransportEvent::Disconnected { .. } => "disconnected",
            TransportEvent::Reconnecting { .. } => "reconnecting",
            TransportEvent::Ping => "ping",
            TransportEvent::Pong { .. } => "pong",
            TransportEvent::Error { .. } => "error",
            TransportEvent::Frame { .. } => "frame",
        }
    }
}
