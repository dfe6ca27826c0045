//! Error types for model backend calls

use std::time::Duration;

use agent_core::AgentError;

/// Result type for model backend operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors raised by a model backend
///
/// Any of these ends the calling agent's loop. The HTTP backend retries
/// the ones [`LLMError::is_retryable`] accepts before giving up.
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    /// The request never got a response
    #[error("Request to model backend failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Model backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Rate limited by model backend (retry after {0:?}s)")]
    RateLimited(Option<u64>),

    #[error("Model backend timed out")]
    Timeout,

    /// The response did not have the expected shape
    #[error("Unexpected response from model backend: {0}")]
    Parse(String),

    #[error("Invalid backend configuration: {0}")]
    Config(String),

    /// Any other backend failure
    #[error("Model backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    CoreError(#[from] AgentError),
}

impl LLMError {
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Self::Backend(msg.into())
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Whether sending the same request again may succeed
    ///
    /// Connection failures, rate limiting and server-side statuses are;
    /// timeouts, client errors and malformed responses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Delay the backend asked for before the next attempt
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited(secs) => secs.map(Duration::from_secs),
            _ => None,
        }
    }
}
