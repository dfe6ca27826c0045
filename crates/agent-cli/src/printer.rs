//! Console output for a running agency

use std::io::Write;

use agent_comms::{AgencyHooks, SEND_MESSAGE_TOOL};
use agent_llm::Message;
use agent_runtime::{AgentInfo, AgentRuntimeError, HookError, ToolInvocation};
use async_trait::async_trait;
use serde_json::Value;

/// Prints what every agent says and does
pub struct ConsolePrinter {
    roster: Vec<AgentInfo>,
}

impl ConsolePrinter {
    pub fn new(roster: Vec<AgentInfo>) -> Self {
        Self { roster }
    }

    /// Name of the agent `target` refers to, or `target` itself if unknown
    fn display_name<'a>(&'a self, target: &'a str) -> &'a str {
        let target = target.trim();
        self.roster
            .iter()
            .find(|info| info.id == target || info.name.eq_ignore_ascii_case(target))
            .map(|info| info.name.as_str())
            .unwrap_or(target)
    }

    fn message_line(&self, from: &AgentInfo, arguments: &Value) -> String {
        let target = arguments.get("target").and_then(Value::as_str).unwrap_or("?");
        let content = arguments.get("content").and_then(Value::as_str).unwrap_or("");
        format!("{} to {}: '{}'", from.name, self.display_name(target), content)
    }

    fn emit(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // Stdout going away is not worth failing a run over
        let _ = writeln!(out, "{}", line);
    }
}

/// Render a call as `name(key=value, ...)`
pub fn format_call(name: &str, arguments: &Value) -> String {
    let args = match arguments.as_object() {
        Some(map) => map
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{}={}", key, s),
                other => format!("{}={}", key, other),
            })
            .collect::<Vec<_>>()
            .join(", "),
        None => arguments.to_string(),
    };
    format!("{}({})", name, args)
}

fn first_line(text: &str) -> &str {
    text.trim().lines().next().unwrap_or("")
}

#[async_trait]
impl AgencyHooks for ConsolePrinter {
    fn on_agent_status_change(&self, agent: &AgentInfo, is_running: bool) {
        tracing::debug!(agent = %agent.name, is_running, "Agent status changed");
    }

    async fn on_agent_tool_call(
        &self,
        agent: &AgentInfo,
        call: ToolInvocation,
    ) -> Result<String, HookError> {
        if call.name() == SEND_MESSAGE_TOOL {
            self.emit(&self.message_line(agent, call.arguments()));
            return Ok(call.invoke().await);
        }

        let rendered = format_call(call.name(), call.arguments());
        let result = call.invoke().await;
        self.emit(&format!("{} -> {}", rendered, first_line(&result)));
        Ok(result)
    }

    async fn on_agent_message(&self, agent: &AgentInfo, message: &Message) -> Result<(), HookError> {
        self.emit(&format!("{}: {}", agent.name, message.content.trim()));
        Ok(())
    }

    fn on_agent_error(&self, agent: &AgentInfo, error: &AgentRuntimeError) {
        self.emit(&format!("{} failed: {}", agent.name, error));
    }
}
