//! Echo tool for testing

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::{schema::property, Result, Tool, ToolResult, ToolSchema};

/// Echo tool that returns its input unchanged
pub struct EchoTool;

#[derive(Debug, Deserialize)]
struct EchoParams {
    text: String,
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echo back the provided text (useful for testing)"
    }

    fn parameters_schema(&self) -> ToolSchema {
        ToolSchema::new()
            .with_description("Parameters for echo")
            .with_required_property("text", property("string", "The text to echo back"))
    }

    async fn execute(&self, params: Value) -> Result<ToolResult> {
        let params: EchoParams = serde_json::from_value(params)
            .map_err(|e| crate::ToolError::invalid_params(self.name(), e.to_string()))?;

        Ok(ToolResult::text(params.text))
    }
}
