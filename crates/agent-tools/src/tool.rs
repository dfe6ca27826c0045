//! Tool trait definition

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, ToolSchema, ToolSpec};

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the tool execution was successful
    pub success: bool,

    /// The result data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create a successful plain-text result
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::success(Value::String(text.into()))
    }

    /// Create an error result
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Render the result as the text the model will see
    ///
    /// Strings are passed through unchanged; other JSON is serialized.
    pub fn to_content(&self) -> String {
        if !self.success {
            return format!(
                "Error: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        match &self.data {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

/// Trait for tools that can be called by agents
///
/// Tools are functions that agents can execute to perform actions
/// or gather information.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's unique name
    ///
    /// This is used to identify and call the tool.
    fn name(&self) -> &str;

    /// Get a human-readable description of what the tool does
    ///
    /// This description is included in the model request to help
    /// the model understand when to use the tool.
    fn description(&self) -> &str;

    /// Get the JSON schema for the tool's parameters
    fn parameters_schema(&self) -> ToolSchema;

    /// Execute the tool with already-validated parameters
    async fn execute(&self, params: Value) -> Result<ToolResult>;

    /// Snapshot of name, description and schema
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success(serde_json::json!({"answer": 42}));
        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.to_content(), r#"{"answer":42}"#);
    }

    #[test]
    fn test_text_content_is_verbatim() {
        let result = ToolResult::text("line one\nline two");
        assert_eq!(result.to_content(), "line one\nline two");
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("Something went wrong");
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.to_content(), "Error: Something went wrong");
    }
}
