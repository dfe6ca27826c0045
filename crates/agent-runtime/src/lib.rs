//! Agent Runtime
//!
//! An [`Agent`] owns a history and a tool set and runs the agentic loop:
//! prompt the model, execute the tool calls it asks for, append the
//! results, and repeat until it answers with plain text.
//!
//! # Example
//!
//! ```no_run
//! use agent_llm::{Message, OpenAIProvider};
//! use agent_runtime::{Agent, NoHooks};
//! use agent_tools::{builtin::BashTool, ToolRegistry};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tools = ToolRegistry::new();
//!     tools.register(BashTool)?;
//!
//!     let mut agent = Agent::builder()
//!         .name("Bob")
//!         .description("Has access to the computer.")
//!         .provider(OpenAIProvider::new("api-key")?)
//!         .tools(tools)
//!         .build()?;
//!
//!     agent.push_message(Message::user("What is the hostname?"));
//!     let response = agent.run(&NoHooks).await?;
//!     println!("{}", response);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod error;
pub mod hooks;
pub mod inbox;

// Re-exports
pub use agent::{Agent, AgentBuilder, AgentInfo, AgentStatus, LoopState};
pub use error::{AgentRuntimeError, HookError, Result};
pub use hooks::{NoHooks, RunHooks, ToolInvocation};
pub use inbox::{EmptyInbox, Inbox};
