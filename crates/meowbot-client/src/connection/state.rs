use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use meowbot_core::error::{MeowError, Result};

/// Status of the single logical connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
    AwaitingPong = 3,
    Reconnecting = 4,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::AwaitingPong => "awaiting_pong",
            ConnectionState::Reconnecting => "reconnecting",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            3 => ConnectionState::AwaitingPong,
            4 => ConnectionState::Reconnecting,
            _ => ConnectionState::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a ping notification did to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingOutcome {
    /// Connected -> AwaitingPong. Carries the heartbeat sequence number.
    Armed(u64),
    /// Ping while still awaiting the previous pong: now Reconnecting.
    Missed,
    /// Not connected; nothing changed.
    Ignored,
}

/// What a transport `Disconnected` notification did to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// Connection lost; now Reconnecting (retry) or Disconnected.
    Lost(ConnectionState),
    /// Teardown the client forced after a missed heartbeat; already handled.
    Expected,
    /// Already down; nothing changed.
    Ignored,
}

const STATE_MASK: u64 = 0xff;
const FORCED: u64 = 1 << 8;
const SEQ_SHIFT: u32 = 16;
const SEQ_MAX: u64 = u64::MAX >> SEQ_SHIFT;

/// Unpacked view of the machine word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Word {
    state: ConnectionState,
    /// A forced teardown is in flight; its `Disconnected` is not a new loss.
    forced: bool,
    /// Bumped on every armed ping; lets a stale pong timer recognise itself.
    seq: u64,
}

impl Word {
    fn unpack(raw: u64) -> Self {
        Self {
            state: ConnectionState::from_u8((raw & STATE_MASK) as u8),
            forced: raw & FORCED != 0,
            seq: raw >> SEQ_SHIFT,
        }
    }

    fn pack(self) -> u64 {
        let forced = if self.forced { FORCED } else { 0 };
        (self.seq << SEQ_SHIFT) | forced | self.state as u64
    }

    fn with_state(self, state: ConnectionState) -> Self {
        Self { state, ..self }
    }
}

/// Lock-free connection state machine.
///
/// State, the forced-teardown marker and the heartbeat sequence share one
/// atomic word. Every transition is a single compare-and-swap, so transport
/// callbacks, pong timers and [`close`](Self::close) can interleave without a
/// lock and without ever observing a half-applied transition.
pub struct ConnectionStateMachine {
    word: AtomicU64,
}

impl Default for ConnectionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionStateMachine {
    pub fn new() -> Self {
        Self {
            word: AtomicU64::new(ConnectionState::Disconnected as u64),
        }
    }

    pub fn status(&self) -> ConnectionState {
        Word::unpack(self.word.load(Ordering::Acquire)).state
    }

    /// Apply `f` atomically. Returns `(from, to)` when a transition happened.
    fn transition(&self, f: impl Fn(Word) -> Option<Word>) -> Option<(Word, Word)> {
        let mut to = None;
        let prev = self
            .word
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                let next = f(Word::unpack(raw));
                to = next;
                next.map(Word::pack)
            })
            .ok()?;
        to.map(|to| (Word::unpack(prev), to))
    }

    /// Explicit connect: Disconnected | Reconnecting -> Connecting.
    pub fn begin_connect(&self) -> Result<ConnectionState> {
        match self.transition(|w| match w.state {
            ConnectionState::Disconnected | ConnectionState::Reconnecting => {
                Some(w.with_state(ConnectionState::Connecting))
            }
            _ => None,
        }) {
            Some((from, _)) => Ok(from.state),
            None => Err(MeowError::InvalidState {
                op: "connect",
                state: self.status().as_str(),
            }),
        }
    }

    /// Reconnect task: Reconnecting -> Connecting only. Fails once closed.
    pub fn begin_reconnect(&self) -> bool {
        self.transition(|w| match w.state {
            ConnectionState::Reconnecting => Some(w.with_state(ConnectionState::Connecting)),
            _ => None,
        })
        .is_some()
    }

    /// Transport reported connected. Ignored after an explicit close.
    ///
    /// Also retires a pending forced teardown: transports report the old
    /// socket's close before the new one's connect.
    pub fn on_connected(&self) -> bool {
        self.transition(|w| match w.state {
            ConnectionState::Disconnected | ConnectionState::Connected => None,
            _ => Some(Word {
                state: ConnectionState::Connected,
                forced: false,
                ..w
            }),
        })
        .is_some()
    }

    /// Transport could not start connecting.
    pub fn on_connect_failed(&self, retry: bool) -> bool {
        let next = if retry {
            ConnectionState::Reconnecting
        } else {
            ConnectionState::Disconnected
        };
        self.transition(|w| match w.state {
            ConnectionState::Connecting => Some(w.with_state(next)),
            _ => None,
        })
        .is_some()
    }

    pub fn on_ping(&self) -> PingOutcome {
        match self.transition(|w| match w.state {
            ConnectionState::Connected => Some(Word {
                state: ConnectionState::AwaitingPong,
                seq: (w.seq + 1) & SEQ_MAX,
                ..w
            }),
            ConnectionState::AwaitingPong => Some(Word {
                state: ConnectionState::Reconnecting,
                forced: true,
                ..w
            }),
            _ => None,
        }) {
            Some((_, to)) if to.state == ConnectionState::AwaitingPong => {
                PingOutcome::Armed(to.seq)
            }
            Some(_) => PingOutcome::Missed,
            None => PingOutcome::Ignored,
        }
    }

    /// AwaitingPong -> Connected.
    pub fn on_pong(&self) -> bool {
        self.transition(|w| match w.state {
            ConnectionState::AwaitingPong => Some(w.with_state(ConnectionState::Connected)),
            _ => None,
        })
        .is_some()
    }

    /// The pong window for heartbeat `seq` elapsed. Missed only if that very
    /// heartbeat is still outstanding.
    pub fn on_pong_timeout(&self, seq: u64) -> bool {
        self.transition(|w| match w.state {
            ConnectionState::AwaitingPong if w.seq == seq => Some(Word {
                state: ConnectionState::Reconnecting,
                forced: true,
                ..w
            }),
            _ => None,
        })
        .is_some()
    }

    /// Transport dropped the connection without an explicit close.
    pub fn on_disconnected(&self, retry: bool) -> DisconnectOutcome {
        let lost = if retry {
            ConnectionState::Reconnecting
        } else {
            ConnectionState::Disconnected
        };
        match self.transition(|w| {
            if w.forced {
                return Some(Word { forced: false, ..w });
            }
            match w.state {
                ConnectionState::Disconnected => None,
                // a reconnect is already scheduled
                ConnectionState::Reconnecting if retry => None,
                _ => Some(w.with_state(lost)),
            }
        }) {
            Some((from, _)) if from.forced => DisconnectOutcome::Expected,
            Some((_, to)) => DisconnectOutcome::Lost(to.state),
            None => DisconnectOutcome::Ignored,
        }
    }

    /// Any state -> Disconnected. Returns the previous state.
    pub fn close(&self) -> ConnectionState {
        let prev = self.word.fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
            Some(
                Word {
                    state: ConnectionState::Disconnected,
                    forced: false,
                    ..Word::unpack(raw)
                }
                .pack(),
            )
        });
        Word::unpack(prev.unwrap_or_else(|raw| raw)).state
    }
}
