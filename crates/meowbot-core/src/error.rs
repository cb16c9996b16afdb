//! Shared error type across meowbot crates.

use thiserror::Error;

/// Stable error codes (used in logs and test vectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// `EventMsg` wrapper missing or not an object.
    MalformedEnvelope,
    /// `EventName` missing.
    MissingEventTag,
    /// `EventData` missing.
    MissingEventData,
    /// `EventData` present but a leaf has the wrong JSON type.
    MalformedEventData,
    /// Inbound frame is not a JSON object.
    MalformedFrame,
    /// Decision requested on a variant that does not carry one.
    NotDecisionBearing,
    /// Transport collaborator failure.
    Transport,
    /// Action submission collaborator failure.
    ActionSubmission,
    /// Lifecycle operation not valid in the current connection state.
    InvalidState,
    /// Subscriber callback failure.
    Subscriber,
    /// Invalid configuration.
    Config,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Anything else.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MalformedEnvelope => "MALFORMED_ENVELOPE",
            ErrorCode::MissingEventTag => "MISSING_EVENT_TAG",
            ErrorCode::MissingEventData => "MISSING_EVENT_DATA",
            ErrorCode::MalformedEventData => "MALFORMED_EVENT_DATA",
            ErrorCode::MalformedFrame => "MALFORMED_FRAME",
            ErrorCode::NotDecisionBearing => "NOT_DECISION_BEARING",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::ActionSubmission => "ACTION_SUBMISSION",
            ErrorCode::InvalidState => "INVALID_STATE",
            ErrorCode::Subscriber => "SUBSCRIBER",
            ErrorCode::Config => "CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Per-frame decode failures: the frame is dropped, the connection survives.
    pub fn is_frame_drop(self) -> bool {
        matches!(
            self,
            ErrorCode::MalformedEnvelope
                | ErrorCode::MissingEventTag
                | ErrorCode::MissingEventData
                | ErrorCode::MalformedEventData
                | ErrorCode::MalformedFrame
        )
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MeowError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum MeowError {
    #[error("malformed envelope: missing EventMsg object")]
    MalformedEnvelope,
    #[error("missing EventName")]
    MissingEventTag,
    #[error("missing EventData")]
    MissingEventData,
    #[error("malformed event data: {0}")]
    MalformedEventData(String),
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
    #[error("event {0} does not carry a decision")]
    NotDecisionBearing(&'static str),
    #[error("transport: {0}")]
    Transport(String),
    #[error("action submission failed: {0}")]
    ActionSubmission(String),
    #[error("{op} not allowed while {state}")]
    InvalidState { op: &'static str, state: &'static str },
    #[error("subscriber: {0}")]
    Subscriber(String),
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl MeowError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MeowError::MalformedEnvelope => ErrorCode::MalformedEnvelope,
            MeowError::MissingEventTag => ErrorCode::MissingEventTag,
            MeowError::MissingEventData => ErrorCode::MissingEventData,
            MeowError::MalformedEventData(_) => ErrorCode::MalformedEventData,
            MeowError::MalformedFrame(_) => ErrorCode::MalformedFrame,
            MeowError::NotDecisionBearing(_) => ErrorCode::NotDecisionBearing,
            MeowError::Transport(_) => ErrorCode::Transport,
            MeowError::ActionSubmission(_) => ErrorCode::ActionSubmission,
            MeowError::InvalidState { .. } => ErrorCode::InvalidState,
            MeowError::Subscriber(_) => ErrorCode::Subscriber,
            MeowError::Config(_) => ErrorCode::Config,
            MeowError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            MeowError::Internal(_) => ErrorCode::Internal,
        }
    }
}
