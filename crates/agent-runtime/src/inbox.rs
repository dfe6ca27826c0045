//! Source of messages merged into an agent's history between iterations

use agent_llm::Message;

/// Queue of pending input for one agent
///
/// [`crate::Agent::run_with_inbox`] drains it at the top of every
/// iteration, so everything queued while the model was busy lands in
/// history as one batch before the next model call.
pub trait Inbox: Send + Sync {
    /// Remove and return everything queued, oldest first
    fn drain(&self) -> Vec<Message>;
}

/// Inbox that never has anything
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyInbox;

impl Inbox for EmptyInbox {
    fn drain(&self) -> Vec<Message> {
        Vec::new()
    }
}
