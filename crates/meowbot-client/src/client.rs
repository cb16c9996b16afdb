//! `MeowClient`: the single logical connection plus its subscribers.
//!
//! The transport drives the client through [`MeowClient::notify`]; the client
//! turns those notifications into state transitions, fire-and-forget
//! reconnect tasks and subscriber deliveries. Nothing here blocks: teardown and
//! reconnection run on spawned tasks, so [`MeowClient::close`] is safe to call
//! from inside a subscriber.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::json;
use tokio::sync::mpsc;

use meowbot_core::error::{MeowError, Result};
use meowbot_core::protocol::{Decision, Event, Notification};

use crate::actions::{ActionSubmitter, HttpActionSubmitter};
use crate::config::{ClientConfig, ConnectionSection, LogFlag};
use crate::connection::{ConnectionState, ConnectionStateMachine, DisconnectOutcome, PingOutcome};
use crate::dispatch::{Category, Dispatcher, SubscriptionHandle};
use crate::transport::{Transport, TransportEvent};

/// Heartbeat/reconnect chatter: `info` when the instance asked for server
/// messages, `trace` otherwise.
macro_rules! chatter {
    ($flag:expr, $($arg:tt)+) => {
        if $flag == LogFlag::ServerMessage {
            tracing::info!($($arg)+);
        } else {
            tracing::trace!($($arg)+);
        }
    };
}

#[derive(Clone)]
pub struct MeowClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    cfg: ConnectionSection,
    transport: Arc<dyn Transport>,
    submitter: Option<Arc<dyn ActionSubmitter>>,
    machine: ConnectionStateMachine,
    dispatcher: Dispatcher,
    /// Unix millis of the last Connected notification; 0 = never.
    connected_at_ms: AtomicU64,
}

impl MeowClient {
    pub fn new(
        cfg: ConnectionSection,
        transport: Arc<dyn Transport>,
        submitter: Option<Arc<dyn ActionSubmitter>>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                cfg,
                transport,
                submitter,
                machine: ConnectionStateMachine::new(),
                dispatcher: Dispatcher::new(),
                connected_at_ms: AtomicU64::new(0),
            }),
        }
    }

    /// Build from a loaded config. An `actions` section enables the HTTP
    /// action submitter.
    pub fn from_config(cfg: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let submitter = match &cfg.actions {
            Some(a) => Some(Arc::new(HttpActionSubmitter::new(a)?) as Arc<dyn ActionSubmitter>),
            None => None,
        };
        Ok(Self::new(cfg.client.clone(), transport, submitter))
    }

    pub fn config(&self) -> &ConnectionSection {
        &self.inner.cfg
    }

    pub fn status(&self) -> ConnectionState {
        self.inner.machine.status()
    }

    /// Unix millis of the last successful connect.
    pub fn connected_at_ms(&self) -> Option<u64> {
        match self.inner.connected_at_ms.load(Ordering::Acquire) {
            0 => None,
            t => Some(t),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    /// Register `cb` for `category`. A callback that captures a clone of this
    /// client keeps it alive until unsubscribed.
    pub fn subscribe<F>(&self, category: Category, cb: F) -> SubscriptionHandle
    where
        F: Fn(&Notification) -> Result<()> + Send + Sync + 'static,
    {
        self.inner.dispatcher.subscribe(category, Arc::new(cb))
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.inner.dispatcher.unsubscribe(handle)
    }

    // --------------------
    // Lifecycle
    // --------------------

    /// Start connecting. Valid from Disconnected or Reconnecting; the state
    /// becomes Connected once the transport reports it.
    pub async fn connect(&self) -> Result<&Self> {
        self.inner.machine.begin_connect()?;
        tracing::info!(
            uri = %self.inner.transport.uri(),
            engine_io = self.inner.cfg.engine_io,
            "connecting"
        );

        if let Err(e) = self.inner.transport.connect().await {
            self.connect_failed(&e);
            return Err(e);
        }
        Ok(self)
    }

    /// Tear the connection down. Idempotent; never blocks.
    pub fn close(&self) {
        let prev = self.inner.machine.close();
        if prev == ConnectionState::Disconnected {
            return;
        }
        tracing::info!(uri = %self.inner.transport.uri(), from = %prev, "closing");

        let transport = Arc::clone(&self.inner.transport);
        self.spawn("disconnect", async move {
            if let Err(e) = transport.disconnect().await {
                tracing::warn!(error = %e, "transport disconnect failed");
            }
        });
    }

    /// Feed one transport notification. Called by the transport, one at a
    /// time per connection.
    pub fn notify(&self, ev: TransportEvent) {
        let flag = self.inner.cfg.log;
        let uri = self.inner.transport.uri();
        tracing::trace!(kind = ev.kind(), state = %self.status(), "transport notification");

        match ev {
            TransportEvent::Connected => {
                if self.inner.machine.on_connected() {
                    let now = unix_millis();
                    self.inner.connected_at_ms.store(now, Ordering::Release);
                    tracing::info!(uri = %uri, connected_at_ms = now, "connected");
                } else {
                    tracing::debug!(
                        uri = %uri,
                        state = %self.status(),
                        "connected notification ignored"
                    );
                }
            }
            TransportEvent::Disconnected { reason } => {
                let retry = self.inner.cfg.auto_reconnect;
                match self.inner.machine.on_disconnected(retry) {
                    DisconnectOutcome::Lost(state) => {
                        tracing::info!(
                            uri = %uri,
                            reason = %reason,
                            state = %state,
                            "disconnected"
                        );
                        if retry {
                            self.schedule_reconnect(false);
                        }
                    }
                    DisconnectOutcome::Expected => {
                        chatter!(flag, uri = %uri, reason = %reason, "forced teardown closed");
                    }
                    DisconnectOutcome::Ignored => {
                        tracing::debug!(uri = %uri, reason = %reason, "disconnected while down");
                    }
                }
            }
            TransportEvent::Reconnecting { attempt } => {
                chatter!(flag, uri = %uri, attempt, "transport reconnecting");
            }
            TransportEvent::Ping => {
                chatter!(flag, "server ping");
                self.on_ping();
            }
            TransportEvent::Pong { elapsed_ms } => {
                chatter!(flag, elapsed_ms, "server pong");
                self.inner.machine.on_pong();
            }
            TransportEvent::Error { message } => {
                tracing::error!(uri = %uri, error = %message, "transport error");
            }
            TransportEvent::Frame { channel, payload } => {
                // failures are logged by the dispatcher
                let _ = self.inner.dispatcher.dispatch_frame(&channel, payload);
            }
        }
    }

    /// Drive the client from a channel of notifications until it closes.
    pub async fn pump(&self, mut rx: mpsc::Receiver<TransportEvent>) {
        while let Some(ev) = rx.recv().await {
            self.notify(ev);
        }
        tracing::debug!("transport notification channel closed");
    }

    // --------------------
    // Reply actions
    // --------------------

    /// Build and submit the reply for `decision`. Not idempotent: every call
    /// is a separate submission.
    pub async fn decide(&self, event: &Event, decision: Decision) -> Result<String> {
        let submitter = self
            .inner
            .submitter
            .as_ref()
            .ok_or_else(|| MeowError::ActionSubmission("no action submitter configured".into()))?;
        let req = event.decide(decision)?;

        tracing::info!(
            event = event.tag().as_wire(),
            decision = decision.as_str(),
            endpoint = req.endpoint.as_str(),
            "submitting decision"
        );
        submitter.submit(&req).await
    }

    pub async fn accept(&self, event: &Event) -> Result<String> {
        self.decide(event, Decision::Accept).await
    }

    pub async fn deny(&self, event: &Event) -> Result<String> {
        self.decide(event, Decision::Deny).await
    }

    pub async fn dismiss(&self, event: &Event) -> Result<String> {
        self.decide(event, Decision::Dismiss).await
    }

    // --------------------
    // Internals
    // --------------------

    fn on_ping(&self) {
        let flag = self.inner.cfg.log;

        if self.inner.cfg.heartbeat_echo {
            let transport = Arc::clone(&self.inner.transport);
            self.spawn("heartbeat echo", async move {
                if let Err(e) = transport.emit("Ping", json!("heartbeat")).await {
                    tracing::warn!(error = %e, "heartbeat echo failed");
                }
            });
        }

        match self.inner.machine.on_ping() {
            PingOutcome::Armed(seq) => {
                let window = self.inner.cfg.pong_timeout_ms;
                if window > 0 {
                    let client = self.clone();
                    self.spawn("pong timer", async move {
                        tokio::time::sleep(Duration::from_millis(window)).await;
                        if client.inner.machine.on_pong_timeout(seq) {
                            tracing::warn!(window_ms = window, "pong window elapsed, reconnecting");
                            client.schedule_reconnect(true);
                        }
                    });
                }
            }
            PingOutcome::Missed => {
                chatter!(flag, "ping while awaiting pong, reconnecting");
                self.schedule_reconnect(true);
            }
            PingOutcome::Ignored => {}
        }
    }

    fn connect_failed(&self, e: &MeowError) {
        let retry = self.inner.cfg.auto_reconnect;
        tracing::error!(uri = %self.inner.transport.uri(), error = %e, retry, "connect failed");
        if self.inner.machine.on_connect_failed(retry) && retry {
            self.schedule_reconnect(false);
        }
    }

    /// Fire-and-forget reconnect. Aborts if the client was closed meanwhile.
    fn schedule_reconnect(&self, force_disconnect: bool) {
        let client = self.clone();
        self.spawn("reconnect", async move {
            let inner = &client.inner;
            if inner.cfg.reconnect_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(inner.cfg.reconnect_delay_ms)).await;
            }
            if force_disconnect {
                if let Err(e) = inner.transport.disconnect().await {
                    tracing::warn!(error = %e, "forced disconnect failed");
                }
            }
            if !inner.machine.begin_reconnect() {
                tracing::debug!(state = %client.status(), "reconnect aborted");
                return;
            }
            chatter!(inner.cfg.log, uri = %inner.transport.uri(), "reconnecting");
            if let Err(e) = inner.transport.connect().await {
                client.connect_failed(&e);
            }
        });
    }

    fn spawn<F>(&self, what: &'static str, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match tokio::runtime::Handle::try_current() {
            Ok(h) => {
                h.spawn(fut);
            }
            Err(_) => tracing::warn!(task = what, "no tokio runtime, task skipped"),
        }
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1)
}
