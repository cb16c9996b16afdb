//! In-memory collaborators shared by the client integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use meowbot_client::actions::ActionSubmitter;
use meowbot_client::config::ConnectionSection;
use meowbot_client::{MeowClient, Transport, TransportEvent};
use meowbot_core::error::{MeowError, Result};
use meowbot_core::protocol::ActionRequest;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub struct RecordingTransport {
    pub connects: AtomicUsize,
    pub disconnects: AtomicUsize,
    pub emits: Mutex<Vec<(String, Value)>>,
    pub fail_connect: AtomicBool,
}

impl RecordingTransport {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn uri(&self) -> &str {
        "ws://backend.test:10000"
    }

    async fn connect(&self) -> Result<()> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(MeowError::Transport("connection refused".into()));
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn emit(&self, event: &str, payload: Value) -> Result<()> {
        self.emits.lock().unwrap().push((event.to_string(), payload));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSubmitter {
    pub requests: Mutex<Vec<ActionRequest>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl ActionSubmitter for RecordingSubmitter {
    async fn submit(&self, req: &ActionRequest) -> Result<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MeowError::ActionSubmission("http 502: bad gateway".into()));
        }
        self.requests.lock().unwrap().push(req.clone());
        Ok(format!(r#"{{"Ret":0,"Endpoint":"{}"}}"#, req.endpoint.as_str()))
    }
}

pub struct Harness {
    pub client: MeowClient,
    pub transport: Arc<RecordingTransport>,
    pub submitter: Arc<RecordingSubmitter>,
}

pub fn harness_with(cfg: ConnectionSection) -> Harness {
    init_tracing();
    let transport = Arc::new(RecordingTransport::default());
    let submitter = Arc::new(RecordingSubmitter::default());
    let client = MeowClient::new(
        cfg,
        transport.clone() as Arc<dyn Transport>,
        Some(submitter.clone() as Arc<dyn ActionSubmitter>),
    );
    Harness {
        client,
        transport,
        submitter,
    }
}

pub fn harness() -> Harness {
    harness_with(ConnectionSection::new("ws://backend.test:10000"))
}

/// Connect and acknowledge, leaving the client Connected.
pub async fn connected() -> Harness {
    let h = harness();
    h.client.connect().await.unwrap();
    h.client.notify(TransportEvent::Connected);
    h
}

/// Let spawned fire-and-forget tasks run.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

pub fn event_frame(name: &str, data: Value) -> TransportEvent {
    TransportEvent::Frame {
        channel: "OnEvents".into(),
        payload: json!({
            "EventMsg": {
                "FromUin": 3000003,
                "ToUin": 2000002,
                "MsgType": "ON_EVENT_GROUP_ADMINSYSNOTIFY",
                "MsgSeq": 9,
                "Content": "notify"
            },
            "EventName": name,
            "EventData": data
        }),
    }
}

pub fn invite_frame() -> TransportEvent {
    event_frame(
        "ON_EVENT_GROUP_ADMINSYSNOTIFY_INVITE_GROUP",
        json!({
            "Seq": 1600000000123i64,
            "Type": 2,
            "MsgTypeStr": "邀请加群",
            "Who": 3000003,
            "WhoName": "alice",
            "MsgStatusStr": "等待处理",
            "Content": "join us",
            "RefuseContent": null,
            "Flag_7": 8192,
            "Flag_8": 5,
            "GroupId": 4000004,
            "GroupName": "cats",
            "ActionUin": 5000005,
            "ActionName": "bob",
            "ActionGroupCard": "admin bob",
            "Action": 0
        }),
    )
}
