//! Scripted backend for tests and offline demos

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::{
    error::{LLMError, Result},
    provider::{LLMProvider, ModelRequest},
    types::{Message, ModelResponse, ToolCall},
};

/// What the provider saw on one invocation
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Model name passed in
    pub model: String,
    /// System prompt passed in
    pub system_prompt: Option<String>,
    /// Copy of the history at call time
    pub history: Vec<Message>,
    /// Names of the tools offered
    pub tool_names: Vec<String>,
}

enum Step {
    Respond(ModelResponse),
    Fail(String),
}

#[derive(Default)]
struct Script {
    steps: VecDeque<Step>,
    fallback: Option<String>,
    requests: Vec<RecordedRequest>,
}

/// Backend that replays a queue of canned responses
///
/// Clones share the same script, so a test can keep one handle for
/// inspection after giving another to an agent. Once the queue runs dry
/// the provider either repeats its fallback text or fails.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    script: Arc<Mutex<Script>>,
}

impl ScriptedProvider {
    /// Create a provider that replays `responses` in order
    pub fn new(responses: Vec<ModelResponse>) -> Self {
        let provider = Self::default();
        for response in responses {
            provider.push(response);
        }
        provider
    }

    /// Create a provider that always answers with the same text
    pub fn repeating(text: impl Into<String>) -> Self {
        let provider = Self::default();
        provider.script.lock().fallback = Some(text.into());
        provider
    }

    /// Queue another response
    pub fn push(&self, response: ModelResponse) -> &Self {
        self.script.lock().steps.push_back(Step::Respond(response));
        self
    }

    /// Queue a backend failure
    pub fn fail_next(&self, message: impl Into<String>) -> &Self {
        self.script.lock().steps.push_back(Step::Fail(message.into()));
        self
    }

    /// Build a tool call with a fresh id
    pub fn call(name: impl Into<String>, arguments: Value) -> ToolCall {
        let id = uuid::Uuid::new_v4().simple().to_string();
        ToolCall::new(format!("call_{}", &id[..8]), name, arguments)
    }

    /// Every request seen so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().requests.clone()
    }

    /// How many times the provider was invoked
    pub fn call_count(&self) -> usize {
        self.script.lock().requests.len()
    }

    /// Responses still queued
    pub fn remaining(&self) -> usize {
        self.script.lock().steps.len()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn invoke(&self, request: ModelRequest<'_>) -> Result<ModelResponse> {
        let mut script = self.script.lock();
        script.requests.push(RecordedRequest {
            model: request.model.to_string(),
            system_prompt: request.system_prompt.map(str::to_string),
            history: request.history.to_vec(),
            tool_names: request.tools.iter().map(|t| t.name.clone()).collect(),
        });

        match script.steps.pop_front() {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(message)) => Err(LLMError::backend(message)),
            None => match &script.fallback {
                Some(text) => Ok(ModelResponse::text(text.clone())),
                None => Err(LLMError::backend("script exhausted")),
            },
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
