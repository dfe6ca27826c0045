//! Error types for the agency workspace
//!
//! `AgentError` is the base error every other crate in the workspace
//! can fall back to through its `CoreError` variant.

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Base error type for the agency workspace
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration parsing errors
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] config::ConfigError),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a logging error
    pub fn logging<S: Into<String>>(msg: S) -> Self {
        Self::Logging(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}
