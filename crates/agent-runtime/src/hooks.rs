//! Run hooks
//!
//! Extension points called from inside the agentic loop. Every method has
//! a default, so an implementation only overrides what it needs.

use std::fmt;
use std::sync::Arc;

use agent_llm::{Message, ToolCall};
use agent_tools::Tool;
use async_trait::async_trait;
use serde_json::Value;

use crate::error::HookError;

/// A resolved tool call waiting to be executed
///
/// Handed to [`RunHooks::on_tool_call`], which may inspect it, rewrite its
/// arguments, run it, or return a substitute result without running it.
pub struct ToolInvocation {
    tool: Arc<dyn Tool>,
    call: ToolCall,
}

impl ToolInvocation {
    /// Pair a resolved tool with the call that requested it
    pub fn new(tool: Arc<dyn Tool>, call: ToolCall) -> Self {
        Self { tool, call }
    }

    /// Name of the tool
    pub fn name(&self) -> &str {
        &self.call.name
    }

    /// Id of the originating tool call
    pub fn call_id(&self) -> &str {
        &self.call.id
    }

    /// Arguments the model supplied
    pub fn arguments(&self) -> &Value {
        &self.call.arguments
    }

    /// Replace the arguments before invoking
    pub fn with_arguments(mut self, arguments: Value) -> Self {
        self.call.arguments = arguments;
        self
    }

    /// Execute the tool and render its outcome as tool-result text
    ///
    /// A tool that returns an error does not fail the run; the error is
    /// reported to the model instead.
    pub async fn invoke(self) -> String {
        match self.tool.execute(self.call.arguments).await {
            Ok(result) => result.to_content(),
            Err(e) => {
                tracing::warn!(tool = %self.call.name, error = %e, "Tool execution failed");
                format!("Tool '{}' failed: {}", self.call.name, e)
            }
        }
    }
}

impl fmt::Debug for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolInvocation")
            .field("call", &self.call)
            .finish_non_exhaustive()
    }
}

/// Callbacks invoked by [`crate::Agent::run`]
#[async_trait]
pub trait RunHooks: Send + Sync {
    /// Called before each model invocation
    async fn on_before_iteration(&self) -> Result<(), HookError> {
        Ok(())
    }

    /// Called once a round has finished, after tool results are appended
    /// or after the final message
    async fn on_after_iteration(&self) -> Result<(), HookError> {
        Ok(())
    }

    /// Called once per requested tool call; the returned text becomes the
    /// tool result
    async fn on_tool_call(&self, call: ToolInvocation) -> Result<String, HookError> {
        Ok(call.invoke().await)
    }

    /// Called with the final assistant message
    async fn on_message(&self, _message: &Message) -> Result<(), HookError> {
        Ok(())
    }
}

/// Hooks that keep every default
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl RunHooks for NoHooks {}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_tools::builtin::EchoTool;
    use serde_json::json;

    #[tokio::test]
    async fn test_default_tool_call_invokes_tool() {
        let call = ToolCall::new("c1", "echo", json!({"text": "hi"}));
        let invocation = ToolInvocation::new(Arc::new(EchoTool), call);
        assert_eq!(NoHooks.on_tool_call(invocation).await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_rewritten_arguments_are_used() {
        let call = ToolCall::new("c1", "echo", json!({"text": "hi"}));
        let invocation =
            ToolInvocation::new(Arc::new(EchoTool), call).with_arguments(json!({"text": "bye"}));
        assert_eq!(invocation.arguments()["text"], "bye");
        assert_eq!(invocation.invoke().await, "bye");
    }

    #[tokio::test]
    async fn test_tool_error_becomes_text() {
        let call = ToolCall::new("c1", "echo", json!({"wrong": 1}));
        let text = ToolInvocation::new(Arc::new(EchoTool), call).invoke().await;
        assert!(text.starts_with("Tool 'echo' failed:"));
    }
}
