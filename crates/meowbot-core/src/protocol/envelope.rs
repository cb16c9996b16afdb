//! `EventMsg` envelope: routing/sequencing summary common to all events.
//!
//! Leaf fields never fail the parse. Missing numbers read as 0 and missing
//! strings as `None`; only a missing wrapper is an error.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{MeowError, Result};

/// Wrapper key holding the envelope.
pub const ENVELOPE_KEY: &str = "EventMsg";

/// Parsed envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Envelope {
    /// `FromUin`: originating user.
    pub origin_user: i64,
    /// `ToUin`: destination user.
    pub destination_user: i64,
    /// `MsgType`: inner message kind.
    pub inner_kind: Option<String>,
    /// `MsgSeq`: monotonic per connection, not globally unique.
    pub sequence: i64,
    /// `Content`: raw content.
    pub content: Option<String>,
}

impl Envelope {
    /// Extract the envelope from a frame object.
    pub fn from_frame(frame: &Map<String, Value>) -> Result<Self> {
        let em = match frame.get(ENVELOPE_KEY) {
            Some(Value::Object(m)) => m,
            // double-encoded: "EventMsg": "{...}"
            Some(Value::String(s)) => {
                return match serde_json::from_str::<Value>(s) {
                    Ok(Value::Object(m)) => Ok(Self::from_fields(&m)),
                    _ => Err(MeowError::MalformedEnvelope),
                }
            }
            _ => return Err(MeowError::MalformedEnvelope),
        };
        Ok(Self::from_fields(em))
    }

    fn from_fields(em: &Map<String, Value>) -> Self {
        Self {
            origin_user: read_i64(em.get("FromUin")),
            destination_user: read_i64(em.get("ToUin")),
            inner_kind: read_string(em.get("MsgType")),
            sequence: read_i64(em.get("MsgSeq")),
            content: read_string(em.get("Content")),
        }
    }
}

/// Numeric leaf: numbers and numeric strings are accepted, anything else is 0.
pub(crate) fn read_i64(v: Option<&Value>) -> i64 {
    match v {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// String leaf: strings as-is, other non-null values as their JSON text.
pub(crate) fn read_string(v: Option<&Value>) -> Option<String> {
    match v {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}
