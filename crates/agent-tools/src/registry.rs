//! Tool registry for managing and resolving tools

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

use crate::{error::ToolError, tool::Tool, Result, ToolSpec};

/// Registry for managing tools
///
/// Dispatch is a lookup by name; the schema used for argument checking
/// is captured once at registration. Cloning shares the underlying map.
#[derive(Clone)]
pub struct ToolRegistry {
    /// Map of tool name to tool implementation and its schema snapshot
    tools: Arc<DashMap<String, RegisteredTool>>,
}

#[derive(Clone)]
struct RegisteredTool {
    tool: Arc<dyn Tool>,
    spec: ToolSpec,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self {
            tools: Arc::new(DashMap::new()),
        }
    }

    /// Register a tool
    ///
    /// # Returns
    /// Error if a tool with the same name is already registered
    pub fn register<T: Tool + 'static>(&self, tool: T) -> Result<()> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a shared tool
    pub fn register_arc(&self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();

        if self.tools.contains_key(&name) {
            return Err(ToolError::AlreadyRegistered(name));
        }

        let spec = tool.spec();
        self.tools.insert(name.clone(), RegisteredTool { tool, spec });
        tracing::debug!("Registered tool: {}", name);
        Ok(())
    }

    /// Check if a tool is registered
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(|entry| Arc::clone(&entry.value().tool))
    }

    /// Resolve a requested call to a tool, checking its arguments
    ///
    /// Fails with a resolution error (see [`ToolError::is_resolution`]) if
    /// the name is unknown or the arguments violate the tool's schema.
    pub fn resolve(&self, name: &str, arguments: &Value) -> Result<Arc<dyn Tool>> {
        let entry = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::not_found(name))?;

        entry.spec.parameters.validate(name, arguments)?;
        Ok(Arc::clone(&entry.tool))
    }

    /// Specs of all registered tools, ordered by name
    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self
            .tools
            .iter()
            .map(|entry| entry.value().spec.clone())
            .collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// List all registered tool names
    pub fn list_tools(&self) -> Vec<String> {
        self.tools.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
