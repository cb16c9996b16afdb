//! Event classifier: `EventName` + `EventData` -> typed [`Event`].
//!
//! The tag table is a pair of exhaustive matches, so adding a variant without
//! wiring its wire name or payload shape is a compile error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{MeowError, Result};
use crate::protocol::envelope::Envelope;
use crate::protocol::payload::{
    AdminChange, FriendAddRequest, FriendAddStatus, FriendAdded, FriendRemoved, GroupNotify,
    MemberExit, MemberExitSelf, MemberJoin, MessageRevoke, Mute,
};

/// Tag key.
pub const TAG_KEY: &str = "EventName";
/// Event data key.
pub const DATA_KEY: &str = "EventData";

/// Closed set of event kinds known to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTag {
    AdminNotify,
    AdminChange,
    Mute,
    MemberExit,
    MemberExitSelf,
    MemberJoin,
    InviteToGroup,
    MessageRevoke,
    FriendAddRequest,
    FriendAdded,
    FriendAddStatus,
    FriendRemoved,
    /// Tag not in the table. Still dispatched.
    Unclassified,
}

impl EventTag {
    /// Every tag, in declaration order.
    pub const ALL: [EventTag; 13] = [
        EventTag::AdminNotify,
        EventTag::AdminChange,
        EventTag::Mute,
        EventTag::MemberExit,
        EventTag::MemberExitSelf,
        EventTag::MemberJoin,
        EventTag::InviteToGroup,
        EventTag::MessageRevoke,
        EventTag::FriendAddRequest,
        EventTag::FriendAdded,
        EventTag::FriendAddStatus,
        EventTag::FriendRemoved,
        EventTag::Unclassified,
    ];

    /// Exact-match lookup. Unknown names resolve to `Unclassified`.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "ON_EVENT_GROUP_ADMINSYSNOTIFY" => EventTag::AdminNotify,
            "ON_EVENT_GROUP_ADMIN" => EventTag::AdminChange,
            "ON_EVENT_GROUP_SHUT" => EventTag::Mute,
            "ON_EVENT_GROUP_EXIT" => EventTag::MemberExit,
            "ON_EVENT_GROUP_EXIT_SUCC" => EventTag::MemberExitSelf,
            "ON_EVENT_GROUP_JOIN" => EventTag::MemberJoin,
            "ON_EVENT_GROUP_ADMINSYSNOTIFY_INVITE_GROUP" => EventTag::InviteToGroup,
            "ON_EVENT_GROUP_REVOKE" => EventTag::MessageRevoke,
            "ON_EVENT_FRIEND_ADD" => EventTag::FriendAddRequest,
            "ON_EVENT_NOTIFY_PUSHADDFRD" => EventTag::FriendAdded,
            "ON_EVENT_FRIEND_ADD_STATUS" => EventTag::FriendAddStatus,
            "ON_EVENT_FRIEND_DELETE" => EventTag::FriendRemoved,
            _ => EventTag::Unclassified,
        }
    }

    /// Wire name of the tag.
    pub fn as_wire(self) -> &'static str {
        match self {
            EventTag::AdminNotify => "ON_EVENT_GROUP_ADMINSYSNOTIFY",
            EventTag::AdminChange => "ON_EVENT_GROUP_ADMIN",
            EventTag::Mute => "ON_EVENT_GROUP_SHUT",
            EventTag::MemberExit => "ON_EVENT_GROUP_EXIT",
            EventTag::MemberExitSelf => "ON_EVENT_GROUP_EXIT_SUCC",
            EventTag::MemberJoin => "ON_EVENT_GROUP_JOIN",
            EventTag::InviteToGroup => "ON_EVENT_GROUP_ADMINSYSNOTIFY_INVITE_GROUP",
            EventTag::MessageRevoke => "ON_EVENT_GROUP_REVOKE",
            EventTag::FriendAddRequest => "ON_EVENT_FRIEND_ADD",
            EventTag::FriendAdded => "ON_EVENT_NOTIFY_PUSHADDFRD",
            EventTag::FriendAddStatus => "ON_EVENT_FRIEND_ADD_STATUS",
            EventTag::FriendRemoved => "ON_EVENT_FRIEND_DELETE",
            EventTag::Unclassified => "ON_EVENT_NULL_REF",
        }
    }
}

/// Variant-specific payload. Serializes as the bare record (`null` when
/// unclassified).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    AdminNotify(GroupNotify),
    AdminChange(AdminChange),
    Mute(Mute),
    MemberExit(MemberExit),
    MemberExitSelf(MemberExitSelf),
    MemberJoin(MemberJoin),
    InviteToGroup(GroupNotify),
    MessageRevoke(MessageRevoke),
    FriendAddRequest(FriendAddRequest),
    FriendAdded(FriendAdded),
    FriendAddStatus(FriendAddStatus),
    FriendRemoved(FriendRemoved),
    Unclassified,
}

impl EventPayload {
    /// Parse `data` into the shape registered for `tag`.
    pub fn decode(tag: EventTag, data: &Value) -> Result<Self> {
        Ok(match tag {
            EventTag::AdminNotify => EventPayload::AdminNotify(shape(tag, data)?),
            EventTag::AdminChange => EventPayload::AdminChange(shape(tag, data)?),
            EventTag::Mute => EventPayload::Mute(shape(tag, data)?),
            EventTag::MemberExit => EventPayload::MemberExit(shape(tag, data)?),
            EventTag::MemberExitSelf => EventPayload::MemberExitSelf(shape(tag, data)?),
            EventTag::MemberJoin => EventPayload::MemberJoin(shape(tag, data)?),
            EventTag::InviteToGroup => EventPayload::InviteToGroup(shape(tag, data)?),
            EventTag::MessageRevoke => EventPayload::MessageRevoke(shape(tag, data)?),
            EventTag::FriendAddRequest => EventPayload::FriendAddRequest(shape(tag, data)?),
            EventTag::FriendAdded => EventPayload::FriendAdded(shape(tag, data)?),
            EventTag::FriendAddStatus => EventPayload::FriendAddStatus(shape(tag, data)?),
            EventTag::FriendRemoved => EventPayload::FriendRemoved(shape(tag, data)?),
            EventTag::Unclassified => EventPayload::Unclassified,
        })
    }

    /// Tag this payload belongs to.
    pub fn tag(&self) -> EventTag {
        match self {
            EventPayload::AdminNotify(_) => EventTag::AdminNotify,
            EventPayload::AdminChange(_) => EventTag::AdminChange,
            EventPayload::Mute(_) => EventTag::Mute,
            EventPayload::MemberExit(_) => EventTag::MemberExit,
            EventPayload::MemberExitSelf(_) => EventTag::MemberExitSelf,
            EventPayload::MemberJoin(_) => EventTag::MemberJoin,
            EventPayload::InviteToGroup(_) => EventTag::InviteToGroup,
            EventPayload::MessageRevoke(_) => EventTag::MessageRevoke,
            EventPayload::FriendAddRequest(_) => EventTag::FriendAddRequest,
            EventPayload::FriendAdded(_) => EventTag::FriendAdded,
            EventPayload::FriendAddStatus(_) => EventTag::FriendAddStatus,
            EventPayload::FriendRemoved(_) => EventTag::FriendRemoved,
            EventPayload::Unclassified => EventTag::Unclassified,
        }
    }
}

fn shape<T: DeserializeOwned>(tag: EventTag, data: &Value) -> Result<T> {
    let parsed;
    let data = match data {
        Value::String(s) => {
            parsed = serde_json::from_str::<Value>(s).map_err(|e| {
                MeowError::MalformedEventData(format!("{}: {e}", tag.as_wire()))
            })?;
            &parsed
        }
        other => other,
    };
    if !data.is_object() {
        return Err(MeowError::MalformedEventData(format!(
            "{}: EventData must be an object",
            tag.as_wire()
        )));
    }
    T::deserialize(data)
        .map_err(|e| MeowError::MalformedEventData(format!("{}: {e}", tag.as_wire())))
}

/// A classified event. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    tag: EventTag,
    name: String,
    envelope: Envelope,
    payload: EventPayload,
}

impl Event {
    /// Classify a generic-events frame.
    ///
    /// Fails only when a top-level section (`EventMsg`, `EventName`,
    /// `EventData`) is missing or the data has the wrong shape.
    pub fn classify(frame: &Map<String, Value>) -> Result<Self> {
        let envelope = Envelope::from_frame(frame)?;

        let name = match frame.get(TAG_KEY) {
            None | Some(Value::Null) => return Err(MeowError::MissingEventTag),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        let tag = EventTag::from_wire(&name);
        if tag == EventTag::Unclassified {
            tracing::debug!(event = %name, "unclassified event tag");
        }

        let data = match frame.get(DATA_KEY) {
            None | Some(Value::Null) => return Err(MeowError::MissingEventData),
            Some(d) => d,
        };
        let payload = EventPayload::decode(tag, data)?;

        Ok(Self {
            tag,
            name,
            envelope,
            payload,
        })
    }

    pub fn tag(&self) -> EventTag {
        self.tag
    }

    /// `EventName` exactly as received (useful for `Unclassified` events).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }
}
