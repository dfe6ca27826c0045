//! Agent Communication Layer
//!
//! Runs several agents side by side and lets them talk. Every agent gets
//! a mailbox and a `SendMessage` tool; sending to a sleeping agent wakes
//! it on its own worker thread.
//!
//! # Example
//!
//! ```no_run
//! use agent_comms::{Agency, AgencyHooks};
//! use agent_llm::{Message, OpenAIProvider};
//! use agent_runtime::{Agent, AgentInfo, HookError};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl AgencyHooks for Printer {
//!     async fn on_agent_message(&self, agent: &AgentInfo, message: &Message) -> Result<(), HookError> {
//!         println!("{}: {}", agent.name, message.content);
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(OpenAIProvider::new("api-key")?);
//!     let alice = Agent::builder().name("Alice").shared_provider(provider.clone()).build()?;
//!     let bob = Agent::builder().name("Bob").shared_provider(provider).build()?;
//!
//!     let agency = Agency::builder().agents([alice, bob]).hooks(Printer).build()?;
//!     agency.run("Alice", Some("Say hello to Bob"))?;
//!     agency.wait_for_idle(Duration::from_secs(60));
//!     Ok(())
//! }
//! ```

pub mod coordinator;
pub mod error;
pub mod hooks;
pub mod mailbox;
pub mod message;
pub mod registry;
pub mod send_message;

// Re-exports
pub use coordinator::{Agency, AgencyBuilder, AgencyHandle};
pub use error::{CommsError, Result};
pub use hooks::{AgencyHooks, NoAgencyHooks};
pub use mailbox::Mailbox;
pub use message::AgentMessage;
pub use registry::AgentRegistry;
pub use send_message::{SendMessageTool, SEND_MESSAGE_TOOL};
