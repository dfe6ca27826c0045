//! Agent implementation

use std::fmt;
use std::sync::Arc;

use agent_llm::{History, LLMProvider, Message, ModelRequest, ModelResponse};
use agent_tools::{Tool, ToolRegistry};
use serde::{Deserialize, Serialize};

use crate::{
    error::AgentRuntimeError,
    hooks::{RunHooks, ToolInvocation},
    inbox::{EmptyInbox, Inbox},
    Result,
};

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Public identity of an agent, as other agents see it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Stable id, six lowercase hex characters
    pub id: String,
    /// Display name
    pub name: String,
    /// What the agent is for
    pub description: Option<String>,
}

impl fmt::Display for AgentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Whether a run is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Idle,
    Running,
}

/// Position in the agentic loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// Not started
    #[default]
    Idle,
    /// Waiting on the model
    Prompting,
    /// Executing requested tool calls
    Acting,
    /// Final text produced
    Done,
}

/// A conversational agent with its own history and tools
pub struct Agent {
    info: AgentInfo,
    instructions: Option<String>,
    tags: Vec<String>,
    model: String,
    provider: Arc<dyn LLMProvider>,
    tools: ToolRegistry,
    history: History,
    max_iterations: Option<usize>,
    status: AgentStatus,
    state: LoopState,
}

impl Agent {
    /// Create a new agent builder
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// Id, name and description
    pub fn info(&self) -> &AgentInfo {
        &self.info
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn description(&self) -> Option<&str> {
        self.info.description.as_deref()
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The agent's tools
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Conversation so far
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Give the agent one more tool
    ///
    /// The registry is copied first, so a registry shared with other
    /// agents is left untouched.
    pub fn add_tool(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let tools = ToolRegistry::new();
        for name in self.tools.list_tools() {
            if let Some(existing) = self.tools.get_tool(&name) {
                tools.register_arc(existing)?;
            }
        }
        tools.register_arc(tool)?;
        self.tools = tools;
        Ok(())
    }

    /// Replace the id with a fresh random one
    pub fn regenerate_id(&mut self) {
        self.info.id = generate_id();
    }

    /// Append a message to history
    pub fn push_message(&mut self, message: Message) {
        self.history.push(message);
    }

    /// System prompt sent ahead of the history on every model call
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!("You are {}, an agent with id {}.", self.info.name, self.info.id);
        if let Some(description) = &self.info.description {
            prompt.push_str(&format!("\n\n{}", description));
        }
        if let Some(instructions) = &self.instructions {
            prompt.push_str(&format!("\n\n{}", instructions));
        }
        prompt
    }

    /// Run the agentic loop until the model produces a final text
    ///
    /// Returns that text. Unknown tools and invalid arguments are reported
    /// back to the model as tool results; backend and hook failures end
    /// the run.
    pub async fn run(&mut self, hooks: &dyn RunHooks) -> Result<String> {
        self.run_with_inbox(hooks, &EmptyInbox).await
    }

    /// Run the agentic loop, merging pending inbox messages into history
    /// before every model call
    pub async fn run_with_inbox(&mut self, hooks: &dyn RunHooks, inbox: &dyn Inbox) -> Result<String> {
        self.status = AgentStatus::Running;
        self.state = LoopState::Idle;

        let outcome = self.drive(hooks, inbox).await;

        self.status = AgentStatus::Idle;
        if let Err(e) = &outcome {
            tracing::error!(agent = %self.info.name, id = %self.info.id, error = %e, "Agent run failed");
        }
        outcome
    }

    async fn drive(&mut self, hooks: &dyn RunHooks, inbox: &dyn Inbox) -> Result<String> {
        let specs = self.tools.specs();
        let system_prompt = self.system_prompt();
        let mut iterations = 0;

        loop {
            iterations += 1;
            if let Some(max) = self.max_iterations {
                if iterations > max {
                    return Err(AgentRuntimeError::MaxIterationsExceeded(max));
                }
            }

            self.state = LoopState::Prompting;

            let mail = inbox.drain();
            if !mail.is_empty() {
                tracing::debug!(agent = %self.info.name, count = mail.len(), "Merging inbox into history");
                self.history.extend(mail);
            }

            hooks.on_before_iteration().await?;

            tracing::debug!(agent = %self.info.name, iteration = iterations, "Invoking model");
            let response = self
                .provider
                .invoke(ModelRequest {
                    model: &self.model,
                    system_prompt: Some(system_prompt.as_str()),
                    history: self.history.messages(),
                    tools: &specs,
                })
                .await?;

            match response {
                ModelResponse::Text(text) => {
                    let message = Message::assistant(text.clone());
                    self.history.push(message.clone());
                    tracing::info!(agent = %self.info.name, id = %self.info.id, "{}", text);

                    hooks.on_message(&message).await?;
                    hooks.on_after_iteration().await?;

                    self.state = LoopState::Done;
                    return Ok(text);
                }
                ModelResponse::ToolCalls { content, calls } => {
                    self.state = LoopState::Acting;
                    self.history
                        .push(Message::assistant_tool_calls(content, calls.clone()));

                    for call in calls {
                        let call_id = call.id.clone();
                        let result = match self.tools.resolve(&call.name, &call.arguments) {
                            Ok(tool) => {
                                tracing::info!(
                                    agent = %self.info.name,
                                    tool = %call.name,
                                    arguments = %call.arguments,
                                    "Tool call"
                                );
                                hooks.on_tool_call(ToolInvocation::new(tool, call)).await?
                            }
                            Err(e) => {
                                tracing::warn!(agent = %self.info.name, error = %e, "Tool call rejected");
                                e.to_string()
                            }
                        };
                        self.history.push(Message::tool_result(call_id, result));
                    }

                    hooks.on_after_iteration().await?;
                }
            }
        }
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("info", &self.info)
            .field("model", &self.model)
            .field("provider", &self.provider.name())
            .field("tools", &self.tools.list_tools())
            .field("history_len", &self.history.len())
            .field("status", &self.status)
            .finish()
    }
}

/// Builder for constructing an Agent
pub struct AgentBuilder {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    instructions: Option<String>,
    tags: Vec<String>,
    model: String,
    provider: Option<Arc<dyn LLMProvider>>,
    tools: Option<ToolRegistry>,
    max_iterations: Option<usize>,
}

impl AgentBuilder {
    /// Create a new agent builder
    pub fn new() -> Self {
        Self {
            id: None,
            name: None,
            description: None,
            instructions: None,
            tags: Vec::new(),
            model: DEFAULT_MODEL.to_string(),
            provider: None,
            tools: None,
            max_iterations: None,
        }
    }

    /// Start from a fixed id instead of a random one
    ///
    /// An agency still reassigns it if another agent already has it.
    pub fn id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Extra instructions appended to the system prompt
    pub fn instructions<S: Into<String>>(mut self, instructions: S) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set the model identifier passed to the backend
    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    /// Set the LLM provider
    pub fn provider<P: LLMProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set a provider shared with other agents
    pub fn shared_provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Bound the number of model calls in one run; `None` is unbounded
    pub fn max_iterations(mut self, max: impl Into<Option<usize>>) -> Self {
        self.max_iterations = max.into();
        self
    }

    /// Build the agent
    pub fn build(self) -> Result<Agent> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AgentRuntimeError::config("Agent name not set"))?;

        let provider = self
            .provider
            .ok_or_else(|| AgentRuntimeError::config("LLM provider not set"))?;

        if self.max_iterations == Some(0) {
            return Err(AgentRuntimeError::config("max_iterations must be at least 1"));
        }

        let id = match self.id {
            Some(id) if id.trim().is_empty() => {
                return Err(AgentRuntimeError::config("Agent id must not be blank"))
            }
            Some(id) => id,
            None => generate_id(),
        };

        Ok(Agent {
            info: AgentInfo {
                id,
                name,
                description: self.description,
            },
            instructions: self.instructions,
            tags: self.tags,
            model: self.model,
            provider,
            tools: self.tools.unwrap_or_default(),
            history: History::new(),
            max_iterations: self.max_iterations,
            status: AgentStatus::Idle,
            state: LoopState::Idle,
        })
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Six lowercase hex characters
fn generate_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..6].to_string()
}
