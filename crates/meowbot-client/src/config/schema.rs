use serde::Deserialize;
use meowbot_core::error::{MeowError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    pub client: ConnectionSection,

    /// Enables the HTTP action submitter when present.
    #[serde(default)]
    pub actions: Option<ActionsSection>,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MeowError::UnsupportedVersion);
        }

        self.client.validate()?;
        if let Some(actions) = &self.actions {
            actions.validate()?;
        }

        Ok(())
    }
}

/// Per-instance log flag (replaces a process-wide toggle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFlag {
    /// Only connection, disconnection and errors.
    #[default]
    None,
    /// Also ping/pong/reconnect chatter.
    ServerMessage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionSection {
    pub url: String,

    #[serde(default = "default_engine_io")]
    pub engine_io: u8,

    #[serde(default)]
    pub log: LogFlag,

    #[serde(default = "default_auto_reconnect")]
    pub auto_reconnect: bool,

    #[serde(default)]
    pub reconnect_delay_ms: u64,

    /// Bounded pong window after a ping; 0 relies on the next ping alone.
    #[serde(default)]
    pub pong_timeout_ms: u64,

    /// Emit `"Ping"`/`"heartbeat"` back on every server ping.
    #[serde(default)]
    pub heartbeat_echo: bool,
}

impl ConnectionSection {
    /// Defaults for everything except the backend url.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            engine_io: default_engine_io(),
            log: LogFlag::default(),
            auto_reconnect: default_auto_reconnect(),
            reconnect_delay_ms: 0,
            pong_timeout_ms: 0,
            heartbeat_echo: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        const SCHEMES: [&str; 4] = ["ws://", "wss://", "http://", "https://"];
        if !SCHEMES.iter().any(|s| self.url.starts_with(s)) {
            return Err(MeowError::Config(
                "client.url must start with ws://, wss://, http:// or https://".into(),
            ));
        }
        if !(3..=4).contains(&self.engine_io) {
            return Err(MeowError::Config(
                "client.engine_io must be 3 or 4".into(),
            ));
        }
        if self.reconnect_delay_ms > 600000 {
            return Err(MeowError::Config(
                "client.reconnect_delay_ms must be at most 600000".into(),
            ));
        }
        if self.pong_timeout_ms != 0 && !(1000..=120000).contains(&self.pong_timeout_ms) {
            return Err(MeowError::Config(
                "client.pong_timeout_ms must be 0 or between 1000 and 120000".into(),
            ));
        }
        Ok(())
    }
}

fn default_engine_io() -> u8 {
    4
}
fn default_auto_reconnect() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionsSection {
    pub base_url: String,

    /// Bot account the actions are performed as.
    pub bot_uin: i64,

    #[serde(default = "default_action_timeout_ms")]
    pub timeout_ms: u64,
}

impl ActionsSection {
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(MeowError::Config(
                "actions.base_url must start with http:// or https://".into(),
            ));
        }
        if self.bot_uin <= 0 {
            return Err(MeowError::Config("actions.bot_uin must be positive".into()));
        }
        if !(1000..=120000).contains(&self.timeout_ms) {
            return Err(MeowError::Config(
                "actions.timeout_ms must be between 1000 and 120000".into(),
            ));
        }
        Ok(())
    }
}

fn default_action_timeout_ms() -> u64 {
    10000
}
