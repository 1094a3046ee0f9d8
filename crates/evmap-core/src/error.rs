//! Error types for matching and availability detection

use thiserror::Error;

/// Result type for the chargepoint matcher
pub type MatchResult<T> = Result<T, MatchError>;

/// Result type for detector operations
pub type DetectorResult<T> = Result<T, DetectorError>;

/// Raised when raw connectors cannot be reconciled with canonical chargepoints
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The two sources disagree about the plugs at the location
    #[error("{0}")]
    Mismatch(String),
}

impl MatchError {
    pub(crate) fn chargepoints_do_not_match() -> Self {
        MatchError::Mismatch("chargepoints do not match".to_string())
    }
}

/// Errors that can occur while fetching live availability from a network
#[derive(Debug, Error)]
pub enum DetectorError {
    /// Network/I/O failure reaching the external source
    #[error("Transport error: {0}")]
    Transport(String),

    /// The source answered, but with an unexpected status or shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Raw and canonical connector descriptions disagree
    #[error("Match error: {0}")]
    Mismatch(#[from] MatchError),

    /// A request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl DetectorError {
    /// Create a protocol error from any message
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Short classification used in logs and CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            DetectorError::Transport(_) => "transport",
            DetectorError::Protocol(_) => "protocol",
            DetectorError::Mismatch(_) => "mismatch",
            DetectorError::InvalidUrl(_) => "invalid_url",
        }
    }
}
