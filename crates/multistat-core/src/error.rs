//! Shared error type across multistat crates.

use thiserror::Error;

/// Pipeline stage a port failed in (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// HTTP fetch of the status page.
    Fetch,
    /// `key: value` status lines.
    Status,
    /// Scoreboard histogram line.
    Scoreboard,
}

impl Stage {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Status => "status",
            Stage::Scoreboard => "scoreboard",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MultistatError>;

/// Unified error type used by core and agent.
#[derive(Debug, Error)]
pub enum MultistatError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error(transparent)]
    Port(#[from] PortError),
    #[error("state file: {0}")]
    State(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MultistatError {
    /// The failing port, when the error came out of a poll cycle.
    pub fn port(&self) -> Option<u16> {
        match self {
            MultistatError::Port(e) => Some(e.port),
            _ => None,
        }
    }
}

/// Failure of one port's worker, annotated with the port it happened on.
#[derive(Debug, Error)]
#[error("failed at port={port}: {cause}")]
pub struct PortError {
    pub port: u16,
    #[source]
    pub cause: PortFailure,
}

impl PortError {
    pub fn new(port: u16, cause: impl Into<PortFailure>) -> Self {
        Self {
            port,
            cause: cause.into(),
        }
    }

    /// Stage the worker was in when it failed.
    pub fn stage(&self) -> Stage {
        match &self.cause {
            PortFailure::Fetch(_) => Stage::Fetch,
            PortFailure::Parse(ParseError::ScoreboardMissing) => Stage::Scoreboard,
            PortFailure::Parse(_) => Stage::Status,
        }
    }
}

/// The single underlying cause of a port failure.
#[derive(Debug, Error)]
pub enum PortFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Fetching a status page failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("HTTP status error: {0}")]
    Status(u16),
    #[error("body read failed: {0}")]
    Body(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

/// A status document could not be turned into metrics.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("invalid number for {key:?}: {value:?}")]
    StatusValue { key: String, value: String },
    #[error("status data not found")]
    StatusMissing,
    #[error("scoreboard data not found")]
    ScoreboardMissing,
}
