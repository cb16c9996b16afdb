//! Event classifier vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::Value;

use meowbot_core::protocol::{decode_frame, Channel, Event, EventPayload, EventTag, Notification};

mod vector_loader;

#[test]
fn event_vectors() {
    let files = vector_loader::all();
    assert!(files.len() >= 12, "vector pack looks incomplete: {files:?}");

    for f in files {
        let v = vector_loader::load(&f);
        let res = Event::classify(&v.frame_object());

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.code().as_str(), err.code, "vector={}", v.description);
            assert!(e.code().is_frame_drop(), "vector={}", v.description);
            continue;
        }

        let event = res.unwrap_or_else(|e| panic!("vector={} failed: {e}", v.description));
        let ex = v.expect.expect("missing expect block");

        assert_eq!(event.tag().as_wire(), ex.tag, "vector={}", v.description);
        assert_eq!(event.payload().tag(), event.tag(), "vector={}", v.description);
        assert_eq!(
            serde_json::to_value(event.envelope()).unwrap(),
            ex.envelope,
            "vector={}",
            v.description
        );
        assert_eq!(
            serde_json::to_value(event.payload()).unwrap(),
            ex.payload,
            "vector={}",
            v.description
        );
    }
}

#[test]
fn every_known_tag_has_a_vector() {
    let files = vector_loader::all();
    let mut seen = Vec::new();
    for f in files {
        let v = vector_loader::load(&f);
        if let Some(ex) = v.expect {
            seen.push(EventTag::from_wire(&ex.tag));
        }
    }
    for tag in EventTag::ALL {
        assert!(seen.contains(&tag), "no vector for {tag:?}");
    }
}

#[test]
fn unknown_tag_keeps_received_name() {
    let v = vector_loader::load("event_unknown_tag.json");
    let event = Event::classify(&v.frame_object()).unwrap();
    assert_eq!(event.tag(), EventTag::Unclassified);
    assert_eq!(event.name(), "ON_EVENT_GROUP_SOMETHING_NEW");
}

#[test]
fn events_channel_decodes_string_encoded_frames() {
    let v = vector_loader::load("event_member_join.json");
    let body = Value::String(v.frame.to_string());
    let n = decode_frame(Channel::Events, body).unwrap();
    assert_eq!(n.channel(), Channel::Events);
    assert_eq!(n.as_event().unwrap().tag(), EventTag::MemberJoin);
}

#[test]
fn message_channels_pass_the_body_through() {
    let body = serde_json::json!({ "CurrentPacket": { "Data": { "Content": "hi" } } });
    match decode_frame(Channel::GroupMessages, body.clone()).unwrap() {
        Notification::GroupMessage(m) => assert_eq!(Value::Object(m), body),
        other => panic!("unexpected {other:?}"),
    }
    match decode_frame(Channel::FriendMessages, body.clone()).unwrap() {
        Notification::FriendMessage(m) => assert_eq!(Value::Object(m), body),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn non_object_frames_are_rejected() {
    for body in [serde_json::json!([1, 2]), serde_json::json!(3), Value::String("nope".into())] {
        let e = decode_frame(Channel::FriendMessages, body).unwrap_err();
        assert_eq!(e.code().as_str(), "MALFORMED_FRAME");
    }
}

#[test]
fn payload_leaves_read_like_envelope_leaves() {
    for (user, want) in [(Value::Null, 0), (Value::String("123".into()), 123)] {
        let frame = serde_json::json!({
            "EventMsg": { "FromUin": null, "MsgSeq": "5" },
            "EventName": "ON_EVENT_GROUP_EXIT",
            "EventData": { "UserID": user }
        });
        let Value::Object(frame) = frame else { unreachable!() };
        let event = Event::classify(&frame).unwrap();
        assert_eq!(event.envelope().sequence, 5);
        match event.payload() {
            EventPayload::MemberExit(p) => assert_eq!(p.user_id, want),
            other => panic!("unexpected {other:?}"),
        }
    }
}
