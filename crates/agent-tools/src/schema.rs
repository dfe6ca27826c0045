//! JSON Schema descriptions of tool parameters
//!
//! A tool's parameters are a flat object of scalar properties
//! (`string`, `integer`, `number`, `boolean`). The schema is built once
//! when the tool is registered and is also what arguments coming back
//! from the model are checked against.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ToolError;

/// JSON Schema for tool parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Type (always "object" for tool parameters)
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Properties of the object
    #[serde(default)]
    pub properties: Map<String, Value>,

    /// Required properties
    #[serde(default)]
    pub required: Vec<String>,

    /// Description of the schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToolSchema {
    /// Create an empty object schema
    pub fn new() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: Map::new(),
            required: Vec::new(),
            description: None,
        }
    }

    /// Add a property
    pub fn with_property<S: Into<String>>(mut self, name: S, schema: Value) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Add a property and mark it required
    pub fn with_required_property<S: Into<String>>(mut self, name: S, schema: Value) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.insert(name, schema);
        self
    }

    /// Set description
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check model-supplied arguments against this schema
    ///
    /// Arguments must be a JSON object, every required property must be
    /// present, and every declared property must carry a value of its
    /// declared scalar type. Undeclared properties are ignored.
    pub fn validate(&self, tool: &str, arguments: &Value) -> Result<(), ToolError> {
        let args = arguments.as_object().ok_or_else(|| {
            ToolError::invalid_params(tool, format!("expected a JSON object, got {}", arguments))
        })?;

        for name in &self.required {
            if !args.contains_key(name) {
                return Err(ToolError::invalid_params(
                    tool,
                    format!("missing required argument '{}'", name),
                ));
            }
        }

        for (name, value) in args {
            let Some(declared) = self
                .properties
                .get(name)
                .and_then(|p| p.get("type"))
                .and_then(|t| t.as_str())
            else {
                continue;
            };

            if !value_matches(declared, value) {
                return Err(ToolError::invalid_params(
                    tool,
                    format!("argument '{}' must be of type {}, got {}", name, declared, value),
                ));
            }
        }

        Ok(())
    }
}

impl Default for ToolSchema {
    fn default() -> Self {
        Self::new()
    }
}

fn value_matches(declared: &str, value: &Value) -> bool {
    match declared {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        _ => true,
    }
}

/// Immutable description of a tool as presented to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Name the model uses to call the tool
    pub name: String,
    /// What the tool does
    pub description: String,
    /// Parameter schema
    pub parameters: ToolSchema,
}

impl ToolSpec {
    /// Convert to OpenAI function format
    pub fn to_openai_function(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// Helper to create a simple property schema
pub fn property(type_name: &str, description: &str) -> Value {
    serde_json::json!({
        "type": type_name,
        "description": description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bash_schema() -> ToolSchema {
        ToolSchema::new()
            .with_required_property("command", property("string", "The command"))
            .with_property("timeout", property("integer", "Seconds"))
            .with_property("verbose", property("boolean", "Chatty output"))
            .with_property("ratio", property("number", "Any number"))
    }

    #[test]
    fn test_schema_creation() {
        let schema = bash_schema().with_description("Test schema");

        assert_eq!(schema.schema_type, "object");
        assert_eq!(schema.properties.len(), 4);
        assert_eq!(schema.required, vec!["command".to_string()]);
    }

    #[test]
    fn test_validate_accepts_matching_arguments() {
        let schema = bash_schema();
        let args = json!({"command": "ls", "timeout": 5, "verbose": true, "ratio": 0.5});
        assert!(schema.validate("Bash", &args).is_ok());
    }

    #[test]
    fn test_integer_satisfies_number() {
        let schema = bash_schema();
        assert!(schema.validate("Bash", &json!({"command": "ls", "ratio": 2})).is_ok());
    }

    #[test]
    fn test_validate_missing_required() {
        let err = bash_schema().validate("Bash", &json!({})).unwrap_err();
        assert!(err.is_resolution());
        assert!(err.to_string().contains("missing required argument 'command'"));
    }

    #[test]
    fn test_validate_wrong_type() {
        let err = bash_schema()
            .validate("Bash", &json!({"command": "ls", "timeout": "soon"}))
            .unwrap_err();
        assert!(err.to_string().contains("'timeout' must be of type integer"));
    }

    #[test]
    fn test_validate_float_is_not_integer() {
        let result = bash_schema().validate("Bash", &json!({"command": "ls", "timeout": 1.5}));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_non_object() {
        let err = bash_schema()
            .validate("Bash", &Value::String("not json {".into()))
            .unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_openai_format() {
        let spec = ToolSpec {
            name: "search".to_string(),
            description: "Search the web".to_string(),
            parameters: ToolSchema::new()
                .with_required_property("query", property("string", "Search query")),
        };

        let function = spec.to_openai_function();
        assert_eq!(function["type"], "function");
        assert_eq!(function["function"]["name"], "search");
        assert_eq!(function["function"]["parameters"]["required"][0], "query");
    }

    #[test]
    fn test_property_helper() {
        let prop = property("string", "A string field");
        assert_eq!(prop["type"], "string");
        assert_eq!(prop["description"], "A string field");
    }
}
