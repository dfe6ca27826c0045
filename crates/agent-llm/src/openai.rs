//! OpenAI-compatible chat completions backend
//!
//! Works against any server exposing `/chat/completions` with function
//! tools (OpenAI, Ollama, vLLM, ...).

use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::{
    error::{LLMError, Result},
    parser,
    provider::{LLMProvider, ModelRequest},
    types::{Message, MessageRole, ModelResponse},
};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI-compatible API provider
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAIProvider {
    /// Create a new provider against the public OpenAI API
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LLMError::config("API key cannot be empty"));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: OPENAI_API_BASE.to_string(),
            timeout: Duration::from_secs(60),
        })
    }

    /// Point the provider at another OpenAI-compatible server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Convert the system prompt and history to OpenAI format
    fn format_messages(&self, system_prompt: Option<&str>, history: &[Message]) -> Vec<OpenAIMessage> {
        let system = system_prompt.map(|prompt| OpenAIMessage {
            role: "system".to_string(),
            content: Some(prompt.to_string()),
            tool_calls: None,
            tool_call_id: None,
        });

        system
            .into_iter()
            .chain(history.iter().map(|msg| {
                let role = match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                    MessageRole::ToolResult => "tool",
                };

                let tool_calls = msg.has_tool_calls().then(|| {
                    msg.tool_calls
                        .iter()
                        .map(|call| {
                            serde_json::json!({
                                "id": call.id,
                                "type": "function",
                                "function": {
                                    "name": call.name,
                                    "arguments": call.arguments.to_string(),
                                }
                            })
                        })
                        .collect()
                });

                OpenAIMessage {
                    role: role.to_string(),
                    content: Some(msg.content.clone()),
                    tool_calls,
                    tool_call_id: msg.tool_call_id.clone(),
                }
            }))
            .collect()
    }

    /// Make a retryable API request
    async fn make_request(&self, request_body: &OpenAIRequest) -> Result<OpenAIResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        let operation = || async {
            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .timeout(self.timeout)
                .json(request_body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        LLMError::Timeout
                    } else {
                        LLMError::Http(e)
                    }
                })
                .map_err(into_backoff)?;

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs: Option<u64> = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok());

                return Err(into_backoff(LLMError::RateLimited(retry_after_secs)));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), "Chat completions request failed");
                return Err(into_backoff(LLMError::Status {
                    status: status.as_u16(),
                    body,
                }));
            }

            response
                .json::<OpenAIResponse>()
                .await
                .map_err(|e| backoff::Error::Permanent(LLMError::parse(e.to_string())))
        };

        let backoff_config = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff_config, operation).await
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn invoke(&self, request: ModelRequest<'_>) -> Result<ModelResponse> {
        let tools: Vec<Value> = request.tools.iter().map(|t| t.to_openai_function()).collect();
        tracing::debug!(
            model = request.model,
            messages = request.history.len(),
            tools = tools.len(),
            "Invoking chat completions"
        );

        let body = OpenAIRequest {
            model: request.model.to_string(),
            messages: self.format_messages(request.system_prompt, request.history),
            stream: false,
            tool_choice: (!tools.is_empty()).then(|| "auto".to_string()),
            tools: (!tools.is_empty()).then_some(tools),
        };

        let response = self.make_request(&body).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::parse("No choices in response"))?;

        let calls = parser::parse_openai_tool_calls(&choice.message)?;
        let content = choice
            .message
            .get("content")
            .and_then(|c| c.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(ModelResponse::from_parts(content, calls))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Retry what may succeed on a second attempt, give up on the rest
fn into_backoff(err: LLMError) -> backoff::Error<LLMError> {
    if err.is_retryable() {
        let retry_after = err.retry_after();
        backoff::Error::Transient { err, retry_after }
    } else {
        backoff::Error::Permanent(err)
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: Value,
}
