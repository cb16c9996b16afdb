//! Inbound transport frames: named channel + JSON body -> [`Notification`].

use serde_json::{Map, Value};

use crate::error::{MeowError, Result};
use crate::protocol::event::Event;

/// Named transport channels the backend pushes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    GroupMessages,
    FriendMessages,
    Events,
}

impl Channel {
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "OnGroupMsgs" => Some(Channel::GroupMessages),
            "OnFriendMsgs" => Some(Channel::FriendMessages),
            "OnEvents" => Some(Channel::Events),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Channel::GroupMessages => "OnGroupMsgs",
            Channel::FriendMessages => "OnFriendMsgs",
            Channel::Events => "OnEvents",
        }
    }
}

/// A successfully decoded frame, as handed to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Group chat message; the body is consumed outside this crate.
    GroupMessage(Map<String, Value>),
    /// Private chat message; the body is consumed outside this crate.
    FriendMessage(Map<String, Value>),
    Event(Event),
}

impl Notification {
    pub fn channel(&self) -> Channel {
        match self {
            Notification::GroupMessage(_) => Channel::GroupMessages,
            Notification::FriendMessage(_) => Channel::FriendMessages,
            Notification::Event(_) => Channel::Events,
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            Notification::Event(e) => Some(e),
            _ => None,
        }
    }
}

/// Decode one frame received on `channel`.
pub fn decode_frame(channel: Channel, body: Value) -> Result<Notification> {
    let obj = into_object(body)?;
    Ok(match channel {
        Channel::GroupMessages => Notification::GroupMessage(obj),
        Channel::FriendMessages => Notification::FriendMessage(obj),
        Channel::Events => Notification::Event(Event::classify(&obj)?),
    })
}

/// Accept an object, or a string holding one.
fn into_object(body: Value) -> Result<Map<String, Value>> {
    match body {
        Value::Object(m) => Ok(m),
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Object(m)) => Ok(m),
            Ok(_) => Err(MeowError::MalformedFrame("frame is not a JSON object".into())),
            Err(e) => Err(MeowError::MalformedFrame(format!("invalid frame json: {e}"))),
        },
        _ => Err(MeowError::MalformedFrame("frame is not a JSON object".into())),
    }
}
