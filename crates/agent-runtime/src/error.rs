//! Error types for agent runtime

use agent_core::AgentError;
use agent_llm::LLMError;
use agent_tools::ToolError;

/// Result type for agent runtime operations
pub type Result<T> = std::result::Result<T, AgentRuntimeError>;

/// Error raised by a run hook
///
/// Hooks run inline in the loop, so a failing hook ends the run the same
/// way a backend failure does.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HookError(pub String);

impl HookError {
    /// Create a hook error
    pub fn new<S: Into<String>>(msg: S) -> Self {
        Self(msg.into())
    }
}

/// Errors that end an agent's run
#[derive(Debug, thiserror::Error)]
pub enum AgentRuntimeError {
    /// Model backend error
    #[error("LLM error: {0}")]
    LLM(#[from] LLMError),

    /// A run hook failed
    #[error("Callback error: {0}")]
    Callback(#[from] HookError),

    /// Tool registration error
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Max iterations exceeded
    #[error("Max iterations exceeded: {0}")]
    MaxIterationsExceeded(usize),

    /// Agent not configured properly
    #[error("Agent configuration error: {0}")]
    Configuration(String),

    /// Generic error from agent-core
    #[error(transparent)]
    CoreError(#[from] AgentError),
}

impl AgentRuntimeError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
}
