//! Protocol modules.
//!
//! - `frame`: channel names and per-channel frame decode.
//! - `envelope`: the `EventMsg` routing summary.
//! - `event` / `payload`: tag table and typed payload records.
//! - `action`: reply requests for decision-bearing events.
//!
//! All decoders are panic-free: malformed input is reported as `MeowError`
//! so one bad frame never takes the connection down.

pub mod action;
pub mod envelope;
pub mod event;
pub mod frame;
pub mod payload;

pub use action::{ActionEndpoint, ActionRequest, Decision, DecisionFamily};
pub use envelope::Envelope;
pub use event::{Event, EventPayload, EventTag};
pub use frame::{decode_frame, Channel, Notification};
