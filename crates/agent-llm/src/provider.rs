//! Model backend trait definition

use agent_tools::ToolSpec;
use async_trait::async_trait;

use crate::{Message, ModelResponse, Result};

/// Everything a backend needs for one invocation
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    /// Model identifier
    pub model: &'a str,
    /// Rendered system prompt, sent ahead of the history
    pub system_prompt: Option<&'a str>,
    /// Full ordered history of the calling agent
    pub history: &'a [Message],
    /// Tools the model may call
    pub tools: &'a [ToolSpec],
}

/// Trait for model backends
///
/// A backend turns an agent's history and tool specs into either a final
/// text or a list of tool calls. Retries and token accounting are the
/// backend's own business; a returned error is final.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Invoke the model once
    ///
    /// # Example
    /// ```no_run
    /// use agent_llm::{LLMProvider, Message, ModelRequest, ModelResponse};
    ///
    /// async fn example(provider: &dyn LLMProvider) -> Result<(), Box<dyn std::error::Error>> {
    ///     let history = vec![Message::user("Hello!")];
    ///     let request = ModelRequest {
    ///         model: "gpt-4o-mini",
    ///         system_prompt: None,
    ///         history: &history,
    ///         tools: &[],
    ///     };
    ///     if let ModelResponse::Text(text) = provider.invoke(request).await? {
    ///         println!("{}", text);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    async fn invoke(&self, request: ModelRequest<'_>) -> Result<ModelResponse>;

    /// Get the provider name
    fn name(&self) -> &str;
}
