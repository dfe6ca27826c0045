//! Send message tool - direct agent-to-agent messaging

use std::sync::Weak;

use agent_runtime::AgentInfo;
use agent_tools::{property, Result, Tool, ToolError, ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::coordinator::AgencyInner;

/// Name the tool is registered under in every agent
pub const SEND_MESSAGE_TOOL: &str = "SendMessage";

/// Tool injected into every agent of an agency for messaging its peers
///
/// Delivering a message wakes the recipient if it is asleep.
pub struct SendMessageTool {
    agency: Weak<AgencyInner>,
    sender: AgentInfo,
    description: String,
}

#[derive(Debug, Deserialize)]
struct SendMessageParams {
    target: String,
    content: String,
}

impl SendMessageTool {
    pub(crate) fn new(agency: Weak<AgencyInner>, sender: AgentInfo, peers: &[AgentInfo]) -> Self {
        let roster: Vec<String> = peers
            .iter()
            .map(|peer| {
                format!(
                    "* {} - {}",
                    peer,
                    peer.description.as_deref().unwrap_or("No description")
                )
            })
            .collect();

        Self {
            agency,
            sender,
            description: format!(
                "Send a message to another agent. Available agents:\n{}",
                roster.join("\n")
            ),
        }
    }
}

#[async_trait]
impl Tool for SendMessageTool {
    fn name(&self) -> &str {
        SEND_MESSAGE_TOOL
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> ToolSchema {
        ToolSchema::new()
            .with_description("Parameters for sending a message to another agent")
            .with_required_property(
                "target",
                property("string", "The ID or name of the agent to send the message to"),
            )
            .with_required_property("content", property("string", "The message content"))
    }

    async fn execute(&self, params: Value) -> Result<ToolResult> {
        let params: SendMessageParams = serde_json::from_value(params)
            .map_err(|e| ToolError::invalid_params(self.name(), e.to_string()))?;

        let agency = self
            .agency
            .upgrade()
            .ok_or_else(|| ToolError::execution("agency is no longer running"))?;

        match agency.deliver(Some(&self.sender), &params.target, params.content) {
            Ok(recipient) => {
                tracing::info!("Agent {} sent message to {}", self.sender, recipient);
                Ok(ToolResult::text(format!("Message sent to {}", recipient)))
            }
            Err(e) => {
                tracing::warn!(sender = %self.sender, target = %params.target, error = %e, "Message not delivered");
                Ok(ToolResult::error(e.to_string()))
            }
        }
    }
}
