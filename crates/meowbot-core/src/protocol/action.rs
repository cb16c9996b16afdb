//! Reply actions for decision-bearing events.
//!
//! Building a reply is pure: the payload is copied, the decision code stamped
//! on the copy, and the copy serialized. The classified [`Event`] is never
//! mutated, so subscribers sharing it keep seeing what was received.
//!
//! The backend does not deduplicate decisions. Submitting several requests
//! built from the same event sends several decisions; that is a caller error
//! and is not checked here.

use serde::Serialize;
use serde_json::Value;

use crate::error::{MeowError, Result};
use crate::protocol::event::{Event, EventPayload};
use crate::protocol::payload::{FriendAddRequest, GroupNotify};

/// Reply verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Accept,
    Deny,
    Dismiss,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Accept => "accept",
            Decision::Deny => "deny",
            Decision::Dismiss => "dismiss",
        }
    }
}

/// Decision-bearing families. Each has its own code table and endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionFamily {
    /// Someone invited the bot into a group.
    GroupInvite,
    /// Someone asked to join a group the bot administers (admin-notify).
    JoinRequest,
    /// Someone asked to befriend the bot.
    FriendRequest,
}

impl DecisionFamily {
    /// Protocol-fixed decision code.
    pub fn code(self, decision: Decision) -> i64 {
        match (self, decision) {
            (DecisionFamily::GroupInvite, Decision::Accept) => 8,
            (DecisionFamily::GroupInvite, Decision::Deny) => 21,
            (DecisionFamily::GroupInvite, Decision::Dismiss) => 14,
            (DecisionFamily::JoinRequest, Decision::Accept) => 11,
            (DecisionFamily::JoinRequest, Decision::Deny) => 21,
            (DecisionFamily::JoinRequest, Decision::Dismiss) => 14,
            (DecisionFamily::FriendRequest, Decision::Accept) => 2,
            (DecisionFamily::FriendRequest, Decision::Deny) => 3,
            (DecisionFamily::FriendRequest, Decision::Dismiss) => 1,
        }
    }

    pub fn endpoint(self) -> ActionEndpoint {
        match self {
            DecisionFamily::GroupInvite | DecisionFamily::JoinRequest => {
                ActionEndpoint::AnswerInviteGroup
            }
            DecisionFamily::FriendRequest => ActionEndpoint::DealFriend,
        }
    }
}

/// Endpoint tag understood by the action-submission collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionEndpoint {
    AnswerInviteGroup,
    DealFriend,
}

impl ActionEndpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionEndpoint::AnswerInviteGroup => "AnswerInviteGroup",
            ActionEndpoint::DealFriend => "DealFriend",
        }
    }
}

/// A serialized reply ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub endpoint: ActionEndpoint,
    pub body: Value,
}

impl ActionRequest {
    /// Decision code carried in the body (`Action`).
    pub fn decision_code(&self) -> Option<i64> {
        self.body.get("Action").and_then(Value::as_i64)
    }
}

/// Payloads carrying a mutable `Action` field.
trait Decidable: Serialize + Clone {
    fn set_decision(&mut self, code: i64);
}

impl Decidable for GroupNotify {
    fn set_decision(&mut self, code: i64) {
        self.action = code;
    }
}

impl Decidable for FriendAddRequest {
    fn set_decision(&mut self, code: i64) {
        self.action = code;
    }
}

fn stamp<T: Decidable>(
    payload: &T,
    family: DecisionFamily,
    decision: Decision,
) -> Result<ActionRequest> {
    let mut copy = payload.clone();
    copy.set_decision(family.code(decision));
    let body = serde_json::to_value(&copy)
        .map_err(|e| MeowError::Internal(format!("action encode failed: {e}")))?;
    Ok(ActionRequest {
        endpoint: family.endpoint(),
        body,
    })
}

impl Event {
    /// Family of this event, if it awaits a decision.
    pub fn decision_family(&self) -> Option<DecisionFamily> {
        match self.payload() {
            EventPayload::InviteToGroup(_) => Some(DecisionFamily::GroupInvite),
            EventPayload::AdminNotify(_) => Some(DecisionFamily::JoinRequest),
            EventPayload::FriendAddRequest(_) => Some(DecisionFamily::FriendRequest),
            _ => None,
        }
    }

    /// Build the reply for `decision`.
    pub fn decide(&self, decision: Decision) -> Result<ActionRequest> {
        match self.payload() {
            EventPayload::InviteToGroup(p) => stamp(p, DecisionFamily::GroupInvite, decision),
            EventPayload::AdminNotify(p) => stamp(p, DecisionFamily::JoinRequest, decision),
            EventPayload::FriendAddRequest(p) => {
                stamp(p, DecisionFamily::FriendRequest, decision)
            }
            _ => Err(MeowError::NotDecisionBearing(self.tag().as_wire())),
        }
    }

    pub fn accept(&self) -> Result<ActionRequest> {
        self.decide(Decision::Accept)
    }

    pub fn deny(&self) -> Result<ActionRequest> {
        self.decide(Decision::Deny)
    }

    pub fn dismiss(&self) -> Result<ActionRequest> {
        self.decide(Decision::Dismiss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_within_a_family() {
        for family in [
            DecisionFamily::GroupInvite,
            DecisionFamily::JoinRequest,
            DecisionFamily::FriendRequest,
        ] {
            let a = family.code(Decision::Accept);
            let d = family.code(Decision::Deny);
            let x = family.code(Decision::Dismiss);
            assert!(a != d && d != x && a != x, "{family:?}");
        }
    }
}
