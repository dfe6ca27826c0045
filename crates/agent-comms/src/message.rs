//! Agent messages

use agent_llm::Message;
use agent_runtime::AgentInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message delivered to an agent's mailbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Message ID
    pub id: String,

    /// Sending agent, or `None` when the message comes from outside the agency
    pub from: Option<AgentInfo>,

    /// Recipient agent ID
    pub to: String,

    /// Message text
    pub body: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl AgentMessage {
    /// Create a message from one agent to another
    pub fn new<S: Into<String>>(from: AgentInfo, to: S, body: S) -> Self {
        Self::build(Some(from), to.into(), body.into())
    }

    /// Create a message from outside the agency
    pub fn external<S: Into<String>>(to: S, body: S) -> Self {
        Self::build(None, to.into(), body.into())
    }

    fn build(from: Option<AgentInfo>, to: String, body: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from,
            to,
            body,
            timestamp: Utc::now(),
        }
    }

    /// Text the recipient sees in its history
    pub fn notification(&self) -> String {
        match &self.from {
            Some(sender) => format!("Message from {}:\n{}", sender, self.body),
            None => self.body.clone(),
        }
    }

    /// Convert into the user message appended to the recipient's history
    pub fn into_history_message(self) -> Message {
        Message::user(self.notification())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_llm::MessageRole;

    fn alice() -> AgentInfo {
        AgentInfo {
            id: "a1b2c3".into(),
            name: "Alice".into(),
            description: None,
        }
    }

    #[test]
    fn test_peer_notification() {
        let msg = AgentMessage::new(alice(), "d4e5f6", "Please check the disk");
        assert_eq!(msg.notification(), "Message from Alice (a1b2c3):\nPlease check the disk");

        let history_message = msg.into_history_message();
        assert_eq!(history_message.role, MessageRole::User);
    }

    #[test]
    fn test_external_message_is_verbatim() {
        let msg = AgentMessage::external("a1b2c3", "hello there");
        assert!(msg.from.is_none());
        assert_eq!(msg.notification(), "hello there");
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = AgentMessage::external("x", "1");
        let b = AgentMessage::external("x", "1");
        assert_ne!(a.id, b.id);
    }
}
