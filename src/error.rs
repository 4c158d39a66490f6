//! Error types for the ball launcher

use crate::protocol::RequestKind;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Ball launcher error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request bytes did not decode into a valid request
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// Request decoded but carried a kind outside the known set
    #[error("Unknown request kind: {0}")]
    UnknownRequestKind(i32),

    /// The launcher hardware (or its simulation) rejected the call
    #[error("Actuator failure: {0}")]
    Actuator(String),

    /// The server answered a request with a failure acknowledgment
    #[error("Ball launcher server failed to process {kind} request")]
    RequestFailed {
        /// Which request was rejected
        kind: RequestKind,
    },

    /// Socket level failure (bind, connect, reset, timeout)
    #[error("Transport error: {0}")]
    Transport(#[source] std::io::Error),

    /// Peer broke the request/reply exchange (bad reply, alternation violation)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<prost::DecodeError> for Error {
    fn from(e: prost::DecodeError) -> Self {
        Error::MalformedMessage(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl Error {
    /// True for connection-level failures, as opposed to request outcomes
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}
