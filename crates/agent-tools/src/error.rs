//! Error types for tool operations

use agent_core::AgentError;

/// Result type for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors that can occur during tool operations
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Tool not found
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// Tool execution failed
    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    /// Arguments do not satisfy the tool's declared schema
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidParameters { tool: String, reason: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Tool already registered
    #[error("Tool already registered: {0}")]
    AlreadyRegistered(String),

    /// Generic error from agent-core
    #[error(transparent)]
    CoreError(#[from] AgentError),
}

impl ToolError {
    /// Create an execution error
    pub fn execution<S: Into<String>>(msg: S) -> Self {
        Self::ExecutionError(msg.into())
    }

    /// Create an invalid parameters error
    pub fn invalid_params<T: Into<String>, S: Into<String>>(tool: T, reason: S) -> Self {
        Self::InvalidParameters {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(tool_name: S) -> Self {
        Self::NotFound(tool_name.into())
    }

    /// True when the call could not be resolved to a tool invocation at all
    ///
    /// Resolution failures are reported back to the model as tool results
    /// and never abort the agent loop.
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidParameters { .. })
    }
}
