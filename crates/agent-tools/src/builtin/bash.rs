//! Shell access for agents

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command;

use crate::{schema::property, Result, Tool, ToolError, ToolResult, ToolSchema};

/// Runs a command through `bash -c` and returns stdout followed by stderr
///
/// A non-zero exit status is not an error; the model sees whatever the
/// command printed.
pub struct BashTool;

#[derive(Debug, Deserialize)]
struct BashParams {
    command: String,
}

#[async_trait]
impl Tool for BashTool {
    fn name(&self) -> &str {
        "Bash"
    }

    fn description(&self) -> &str {
        "Execute a bash command and return the output."
    }

    fn parameters_schema(&self) -> ToolSchema {
        ToolSchema::new()
            .with_required_property("command", property("string", "The bash command to execute."))
    }

    async fn execute(&self, params: Value) -> Result<ToolResult> {
        let params: BashParams = serde_json::from_value(params)
            .map_err(|e| ToolError::invalid_params(self.name(), e.to_string()))?;

        tracing::debug!(command = %params.command, "Running bash command");

        let output = Command::new("bash")
            .arg("-c")
            .arg(&params.command)
            .output()
            .await
            .map_err(|e| ToolError::execution(format!("failed to spawn bash: {}", e)))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ToolResult::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stdout_then_stderr() {
        let result = BashTool
            .execute(serde_json::json!({"command": "echo out; echo err 1>&2"}))
            .await
            .unwrap();
        assert_eq!(result.to_content(), "out\nerr\n");
    }

    #[tokio::test]
    async fn test_failing_command_is_not_an_error() {
        let result = BashTool
            .execute(serde_json::json!({"command": "exit 3"}))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.to_content(), "");
    }

    #[test]
    fn test_schema_requires_command() {
        let schema = BashTool.parameters_schema();
        assert_eq!(schema.required, vec!["command".to_string()]);
    }
}
