//! Error types for agent communication

use agent_core::AgentError;
use agent_runtime::AgentRuntimeError;

/// Result type for communication operations
pub type Result<T> = std::result::Result<T, CommsError>;

/// Errors in agent communication
#[derive(Debug, thiserror::Error)]
pub enum CommsError {
    /// No agent with this id or name
    #[error("Unknown recipient: {0}")]
    UnknownRecipient(String),

    /// Two agents share an id or a name
    #[error("Duplicate agent: {0}")]
    DuplicateAgent(String),

    /// The agency no longer starts workers
    #[error("Agency is shutting down")]
    ShuttingDown,

    /// A worker thread could not be started
    #[error("Failed to spawn worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// Workers still running when the shutdown deadline passed
    #[error("Workers still running after shutdown timeout: {}", .0.join(", "))]
    ShutdownTimeout(Vec<String>),

    /// Error from the agent runtime
    #[error(transparent)]
    Runtime(#[from] AgentRuntimeError),

    /// Generic error from agent-core
    #[error(transparent)]
    CoreError(#[from] AgentError),
}

impl CommsError {
    /// Create an unknown recipient error
    pub fn unknown_recipient<S: Into<String>>(target: S) -> Self {
        Self::UnknownRecipient(target.into())
    }

    /// Create a duplicate agent error
    pub fn duplicate<S: Into<String>>(what: S) -> Self {
        Self::DuplicateAgent(what.into())
    }
}
