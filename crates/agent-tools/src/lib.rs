//! Tool Calling System
//!
//! Tools are named, schema-described invocables an agent's model may
//! request. The registry resolves a requested call by name, checks its
//! arguments against the schema captured at registration, and executes it.
//!
//! # Example
//!
//! ```
//! use agent_tools::{builtin::EchoTool, ToolRegistry};
//! use serde_json::json;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = ToolRegistry::new();
//!     registry.register(EchoTool)?;
//!
//!     let arguments = json!({"text": "hi"});
//!     let tool = registry.resolve("echo", &arguments)?;
//!     let result = tool.execute(arguments).await?;
//!     assert_eq!(result.to_content(), "hi");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod registry;
pub mod schema;
pub mod tool;

// Built-in tools
pub mod builtin;

// Re-exports
pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use schema::{property, ToolSchema, ToolSpec};
pub use tool::{Tool, ToolResult};
