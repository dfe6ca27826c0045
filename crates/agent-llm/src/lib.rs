//! Message model and model-backend contract
//!
//! This crate defines what an agent's history is made of and how a model
//! backend is asked for its next move. One HTTP backend is included for
//! any OpenAI-compatible server, plus a scripted backend for tests.
//!
//! # Example
//!
//! ```no_run
//! use agent_llm::{LLMProvider, Message, ModelRequest, OpenAIProvider};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAIProvider::new("your-api-key")?;
//!     let history = vec![Message::user("Hello, how are you?")];
//!
//!     let response = provider
//!         .invoke(ModelRequest {
//!             model: "gpt-4o-mini",
//!             system_prompt: None,
//!             history: &history,
//!             tools: &[],
//!         })
//!         .await?;
//!     println!("Response: {:?}", response);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod history;
pub mod mock;
pub mod parser;
pub mod provider;
pub mod types;

// Backend implementations
pub mod openai;

// Re-exports
pub use error::{LLMError, Result};
pub use history::History;
pub use mock::{RecordedRequest, ScriptedProvider};
pub use openai::OpenAIProvider;
pub use provider::{LLMProvider, ModelRequest};
pub use types::{Message, MessageRole, ModelResponse, ToolCall};
