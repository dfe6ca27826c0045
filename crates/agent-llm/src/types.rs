//! Message model shared by agents and model backends

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// System message (instructions)
    System,
    /// User message, including mail from other agents
    User,
    /// Assistant message (model response)
    Assistant,
    /// Output of one tool call
    ToolResult,
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Backend-assigned id linking the call to its result
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// Keyword arguments; normally a JSON object of scalars
    pub arguments: Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
    /// Tool calls requested by an assistant message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Call this tool result answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Create a new message
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Create an assistant message that requests tool calls
    pub fn assistant_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::new(MessageRole::Assistant, content)
        }
    }

    /// Create the result message for one tool call
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(MessageRole::ToolResult, content)
        }
    }

    /// Whether this message asks for tools to be run
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// What one model invocation produced
#[derive(Debug, Clone, PartialEq)]
pub enum ModelResponse {
    /// Final text; ends the agent loop
    Text(String),
    /// One or more tool calls, in the order they should run
    ToolCalls {
        /// Text the model emitted alongside the calls, if any
        content: String,
        /// Requested calls
        calls: Vec<ToolCall>,
    },
}

impl ModelResponse {
    /// Create a text response
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Create a response with tool calls and no accompanying text
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self::ToolCalls {
            content: String::new(),
            calls,
        }
    }

    /// Build from text and calls, as a backend would after parsing
    ///
    /// An empty call list means a final text response.
    pub fn from_parts(content: String, calls: Vec<ToolCall>) -> Self {
        if calls.is_empty() {
            Self::Text(content)
        } else {
            Self::ToolCalls { content, calls }
        }
    }
}
