//! Variant payload records.
//!
//! Field names follow the backend's PascalCase wire names. Leaves read the
//! same way as envelope leaves: a missing or `null` number is 0, numeric
//! strings are parsed, and non-string values in string fields keep their JSON
//! text. Unknown fields are ignored so new backend fields never break decode.

use serde::{Deserialize, Serialize};

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::protocol::envelope::{read_i64, read_string};

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        let v = Option::<Value>::deserialize(d)?;
        Ok(read_i64(v.as_ref()))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let v = Option::<Value>::deserialize(d)?;
        Ok(read_string(v.as_ref()))
    }
}

/// Group system notification. Shared by the admin-notify (join request) and
/// invite-to-group families.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct GroupNotify {
    #[serde(deserialize_with = "lenient::number")]
    pub seq: i64,
    /// Notify kind.
    #[serde(rename = "Type", deserialize_with = "lenient::number")]
    pub kind: i64,
    /// Textual kind.
    #[serde(deserialize_with = "lenient::text")]
    pub msg_type_str: Option<String>,
    /// Actor id.
    #[serde(deserialize_with = "lenient::number")]
    pub who: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub who_name: Option<String>,
    /// Response status text.
    #[serde(deserialize_with = "lenient::text")]
    pub msg_status_str: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub refuse_content: Option<String>,
    #[serde(rename = "Flag_7", deserialize_with = "lenient::number")]
    pub flag_7: i64,
    #[serde(rename = "Flag_8", deserialize_with = "lenient::number")]
    pub flag_8: i64,
    #[serde(deserialize_with = "lenient::number")]
    pub group_id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub group_name: Option<String>,
    /// Acting admin.
    #[serde(deserialize_with = "lenient::number")]
    pub action_uin: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub action_name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub action_group_card: Option<String>,
    /// Decision code, stamped on a copy when replying.
    #[serde(deserialize_with = "lenient::number")]
    pub action: i64,
}

/// Admin granted or revoked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminChange {
    /// Non-zero when the user became admin.
    #[serde(rename = "Flag", deserialize_with = "lenient::number")]
    pub flag: i64,
    #[serde(rename = "GroupID", deserialize_with = "lenient::number")]
    pub group_id: i64,
    #[serde(rename = "UserID", deserialize_with = "lenient::number")]
    pub user_id: i64,
}

/// Member muted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mute {
    #[serde(rename = "GroupID", deserialize_with = "lenient::number")]
    pub group_id: i64,
    /// Seconds; 0 lifts the mute.
    #[serde(rename = "ShutTime", deserialize_with = "lenient::number")]
    pub shut_time: i64,
    #[serde(rename = "UserID", deserialize_with = "lenient::number")]
    pub user_id: i64,
}

/// A member left a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberExit {
    #[serde(rename = "UserID", deserialize_with = "lenient::number")]
    pub user_id: i64,
}

/// The bot itself left a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberExitSelf {
    #[serde(rename = "GroupID", deserialize_with = "lenient::number")]
    pub group_id: i64,
}

/// Someone joined a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberJoin {
    /// Inviter.
    #[serde(rename = "InviteUin", deserialize_with = "lenient::number")]
    pub invite_uin: i64,
    #[serde(rename = "UserID", deserialize_with = "lenient::number")]
    pub user_id: i64,
    #[serde(rename = "UserName", deserialize_with = "lenient::text")]
    pub user_name: Option<String>,
}

/// A group message was revoked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageRevoke {
    #[serde(rename = "AdminUserID", deserialize_with = "lenient::number")]
    pub admin_user_id: i64,
    #[serde(rename = "GroupID", deserialize_with = "lenient::number")]
    pub group_id: i64,
    #[serde(rename = "MsgRandom", deserialize_with = "lenient::number")]
    pub msg_random: i64,
    #[serde(rename = "MsgSeq", deserialize_with = "lenient::number")]
    pub msg_seq: i64,
    #[serde(rename = "UserID", deserialize_with = "lenient::number")]
    pub user_id: i64,
}

/// Incoming friend request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendAddRequest {
    #[serde(rename = "UserID", deserialize_with = "lenient::number")]
    pub user_id: i64,
    #[serde(rename = "UserNick", deserialize_with = "lenient::text")]
    pub user_nick: Option<String>,
    #[serde(rename = "FromType", deserialize_with = "lenient::number")]
    pub from_type: i64,
    #[serde(rename = "Type", deserialize_with = "lenient::number")]
    pub kind: i64,
    #[serde(rename = "MsgTypeStr", deserialize_with = "lenient::text")]
    pub msg_type_str: Option<String>,
    #[serde(rename = "Field_3", deserialize_with = "lenient::number")]
    pub field_3: i64,
    #[serde(rename = "Field_8", deserialize_with = "lenient::number")]
    pub field_8: i64,
    /// Verification message.
    #[serde(rename = "Content", deserialize_with = "lenient::text")]
    pub content: Option<String>,
    #[serde(rename = "FromContent", deserialize_with = "lenient::text")]
    pub from_content: Option<String>,
    #[serde(rename = "FromGroupId", deserialize_with = "lenient::number")]
    pub from_group_id: i64,
    #[serde(rename = "FromGroupName", deserialize_with = "lenient::text")]
    pub from_group_name: Option<String>,
    /// Decision code, stamped on a copy when replying.
    #[serde(rename = "Action", deserialize_with = "lenient::number")]
    pub action: i64,
}

/// A friendship was established.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendAdded {
    #[serde(rename = "NickName", deserialize_with = "lenient::text")]
    pub nick_name: Option<String>,
    #[serde(rename = "UserID", deserialize_with = "lenient::number")]
    pub user_id: i64,
}

/// Outcome of a friend request the bot sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendAddStatus {
    #[serde(rename = "NickName", deserialize_with = "lenient::text")]
    pub nick_name: Option<String>,
    #[serde(rename = "Type", deserialize_with = "lenient::number")]
    pub kind: i64,
    #[serde(rename = "TypeStatus", deserialize_with = "lenient::text")]
    pub type_status: Option<String>,
    #[serde(rename = "UserID", deserialize_with = "lenient::number")]
    pub user_id: i64,
}

/// A friend removed the bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendRemoved {
    #[serde(rename = "UserID", deserialize_with = "lenient::number")]
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn null_and_numeric_string_leaves() {
        let m: MessageRevoke = serde_json::from_value(json!({
            "AdminUserID": null,
            "GroupID": "4000004",
            "MsgSeq": 12.0,
            "UserID": true
        }))
        .unwrap();
        assert_eq!(m.admin_user_id, 0);
        assert_eq!(m.group_id, 4000004);
        assert_eq!(m.msg_seq, 12);
        assert_eq!(m.user_id, 0);
    }

    #[test]
    fn string_leaves_keep_non_string_json() {
        let f: FriendAdded = serde_json::from_value(json!({
            "NickName": 77,
            "UserID": " 9 "
        }))
        .unwrap();
        assert_eq!(f.nick_name.as_deref(), Some("77"));
        assert_eq!(f.user_id, 9);

        let j: MemberJoin = serde_json::from_value(json!({ "UserName": null })).unwrap();
        assert_eq!(j, MemberJoin::default());
    }
}
