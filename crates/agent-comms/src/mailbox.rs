//! Per-agent mailbox

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use agent_llm::Message;
use agent_runtime::Inbox;
use parking_lot::{Condvar, Mutex};

use crate::AgentMessage;

/// Ordered, thread-safe queue of inbound messages for one agent
///
/// Any thread may send; only the owning agent's worker drains. A drain
/// takes everything queued at that moment, so mail that piles up during
/// a long model call is merged into the next iteration as one batch.
pub struct Mailbox {
    owner: String,
    queue: Mutex<VecDeque<AgentMessage>>,
    available: Condvar,
}

impl Mailbox {
    /// Create an empty mailbox for the agent with this id
    pub fn new<S: Into<String>>(owner: S) -> Self {
        Self {
            owner: owner.into(),
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Append a message; never blocks beyond the queue lock
    pub fn send(&self, message: AgentMessage) {
        let mut queue = self.queue.lock();
        queue.push_back(message);
        tracing::debug!(mailbox = %self.owner, pending = queue.len(), "Message queued");
        drop(queue);
        self.available.notify_all();
    }

    /// Remove and return everything queued, oldest first
    pub fn drain(&self) -> Vec<AgentMessage> {
        self.queue.lock().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Block until something is queued or the timeout elapses
    ///
    /// Returns whether mail is pending. Does not consume anything.
    pub fn wait_for_mail(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut queue = self.queue.lock();
        while queue.is_empty() {
            if self.available.wait_until(&mut queue, deadline).timed_out() {
                return !queue.is_empty();
            }
        }
        true
    }
}

impl Inbox for Mailbox {
    fn drain(&self) -> Vec<Message> {
        Mailbox::drain(self)
            .into_iter()
            .map(AgentMessage::into_history_message)
            .collect()
    }
}
