//! Agency-level callbacks

use agent_llm::Message;
use agent_runtime::{AgentInfo, AgentRuntimeError, HookError, RunHooks, ToolInvocation};
use async_trait::async_trait;

/// Callbacks fired by an [`crate::Agency`] for every agent it runs
///
/// Same timing as [`RunHooks`], with the originating agent passed first.
/// Everything runs on the agent's worker thread, so implementations
/// should be quick and must not wait for the agency to go idle.
#[async_trait]
pub trait AgencyHooks: Send + Sync {
    /// A worker started (`true`) or stopped (`false`)
    ///
    /// Called exactly once each way per worker, and strictly alternating
    /// for any one agent.
    fn on_agent_status_change(&self, _agent: &AgentInfo, _is_running: bool) {}

    async fn on_agent_before_iteration(&self, _agent: &AgentInfo) -> Result<(), HookError> {
        Ok(())
    }

    async fn on_agent_after_iteration(&self, _agent: &AgentInfo) -> Result<(), HookError> {
        Ok(())
    }

    async fn on_agent_tool_call(
        &self,
        _agent: &AgentInfo,
        call: ToolInvocation,
    ) -> Result<String, HookError> {
        Ok(call.invoke().await)
    }

    async fn on_agent_message(&self, _agent: &AgentInfo, _message: &Message) -> Result<(), HookError> {
        Ok(())
    }

    /// A run ended with an error
    ///
    /// The worker runs the agent again if mail came in meanwhile, and
    /// otherwise stops with the `false` status change.
    fn on_agent_error(&self, _agent: &AgentInfo, _error: &AgentRuntimeError) {}
}

/// Agency hooks that keep every default
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAgencyHooks;

impl AgencyHooks for NoAgencyHooks {}

/// Binds agency hooks to one agent so they can drive its run
pub(crate) struct SeatHooks<'a> {
    pub(crate) hooks: &'a dyn AgencyHooks,
    pub(crate) agent: &'a AgentInfo,
}

#[async_trait]
impl RunHooks for SeatHooks<'_> {
    async fn on_before_iteration(&self) -> Result<(), HookError> {
        self.hooks.on_agent_before_iteration(self.agent).await
    }

    async fn on_after_iteration(&self) -> Result<(), HookError> {
        self.hooks.on_agent_after_iteration(self.agent).await
    }

    async fn on_tool_call(&self, call: ToolInvocation) -> Result<String, HookError> {
        self.hooks.on_agent_tool_call(self.agent, call).await
    }

    async fn on_message(&self, message: &Message) -> Result<(), HookError> {
        self.hooks.on_agent_message(self.agent, message).await
    }
}
