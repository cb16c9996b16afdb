//! Reply actions submitted through the client.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use serde_json::json;

use meowbot_client::config::ConnectionSection;
use meowbot_client::{Category, MeowClient, Transport};
use meowbot_core::protocol::{ActionEndpoint, Event};

mod common;
use common::{event_frame, harness, invite_frame, RecordingTransport};

/// Capture the first event dispatched on the events channel.
fn capture(client: &MeowClient) -> Arc<Mutex<Option<Event>>> {
    let slot: Arc<Mutex<Option<Event>>> = Arc::default();
    let s = Arc::clone(&slot);
    client.subscribe(Category::Events, move |n| {
        if let Some(e) = n.as_event() {
            s.lock().unwrap().get_or_insert_with(|| e.clone());
        }
        Ok(())
    });
    slot
}

#[tokio::test]
async fn accept_then_deny_submits_twice_with_distinct_codes() {
    let h = harness();
    let slot = capture(&h.client);
    h.client.notify(invite_frame());
    let event = slot.lock().unwrap().clone().expect("invite dispatched");

    let r1 = h.client.accept(&event).await.unwrap();
    let r2 = h.client.deny(&event).await.unwrap();
    assert!(r1.contains("AnswerInviteGroup"));
    assert!(r2.contains("AnswerInviteGroup"));

    let reqs = h.submitter.requests.lock().unwrap().clone();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[0].endpoint, ActionEndpoint::AnswerInviteGroup);
    assert_eq!(reqs[0].decision_code(), Some(8));
    assert_eq!(reqs[1].decision_code(), Some(21));
    assert_eq!(reqs[0].body["GroupId"], json!(4000004));
    assert_eq!(reqs[0].body["RefuseContent"], json!(null));
}

#[tokio::test]
async fn friend_request_codes() {
    let h = harness();
    let slot = capture(&h.client);
    h.client.notify(event_frame(
        "ON_EVENT_FRIEND_ADD",
        json!({ "UserID": 3000003, "UserNick": "alice", "Content": "hi" }),
    ));
    let event = slot.lock().unwrap().clone().expect("request dispatched");

    h.client.accept(&event).await.unwrap();
    h.client.deny(&event).await.unwrap();
    h.client.dismiss(&event).await.unwrap();

    let codes: Vec<Option<i64>> = h
        .submitter
        .requests
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.decision_code())
        .collect();
    assert_eq!(codes, vec![Some(2), Some(3), Some(1)]);
    assert!(h
        .submitter
        .requests
        .lock()
        .unwrap()
        .iter()
        .all(|r| r.endpoint == ActionEndpoint::DealFriend));
}

#[tokio::test]
async fn submission_failure_is_returned_not_retried() {
    let h = harness();
    let slot = capture(&h.client);
    h.client.notify(invite_frame());
    let event = slot.lock().unwrap().clone().unwrap();

    h.submitter.fail.store(true, Ordering::SeqCst);
    let err = h.client.dismiss(&event).await.unwrap_err();
    assert_eq!(err.code().as_str(), "ACTION_SUBMISSION");
    assert!(h.submitter.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_decision_event_is_refused_before_submitting() {
    let h = harness();
    let slot = capture(&h.client);
    h.client.notify(event_frame(
        "ON_EVENT_GROUP_SHUT",
        json!({ "GroupID": 1, "ShutTime": 60, "UserID": 2 }),
    ));
    let event = slot.lock().unwrap().clone().unwrap();

    let err = h.client.accept(&event).await.unwrap_err();
    assert_eq!(err.code().as_str(), "NOT_DECISION_BEARING");
    assert!(h.submitter.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn client_without_submitter_reports_it() {
    let client = MeowClient::new(
        ConnectionSection::new("ws://backend.test:10000"),
        Arc::new(RecordingTransport::default()) as Arc<dyn Transport>,
        None,
    );
    let slot = capture(&client);
    client.notify(invite_frame());
    let event = slot.lock().unwrap().clone().unwrap();

    let err = client.accept(&event).await.unwrap_err();
    assert_eq!(err.code().as_str(), "ACTION_SUBMISSION");
}
