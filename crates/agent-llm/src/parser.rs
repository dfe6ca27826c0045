//! Parser for tool calls in OpenAI-style responses

use serde_json::Value;

use crate::{error::LLMError, Result, ToolCall};

/// Parse OpenAI function calls from a response message
///
/// OpenAI returns tool calls in this format:
/// ```json
/// {
///   "tool_calls": [{
///     "id": "call_abc",
///     "type": "function",
///     "function": {
///       "name": "calculator",
///       "arguments": "{\"a\": 5, \"b\": 3}"
///     }
///   }]
/// }
/// ```
///
/// A message without `tool_calls` yields an empty list. Arguments that are
/// not valid JSON are kept as a raw string so schema checking can report
/// them back to the model instead of failing the whole response.
pub fn parse_openai_tool_calls(message: &Value) -> Result<Vec<ToolCall>> {
    let Some(tool_calls) = message.get("tool_calls").and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };

    let mut parsed_calls = Vec::with_capacity(tool_calls.len());

    for (index, call) in tool_calls.iter().enumerate() {
        let id = call
            .get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("call_{}", index));

        let function = call
            .get("function")
            .ok_or_else(|| LLMError::parse("Missing function field"))?;

        let name = function
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| LLMError::parse("Missing function name"))?
            .to_string();

        let arguments = match function.get("arguments") {
            Some(Value::String(raw)) if raw.trim().is_empty() => Value::Object(Default::default()),
            Some(Value::String(raw)) => {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
            }
            Some(other) => other.clone(),
            None => Value::Object(Default::default()),
        };

        parsed_calls.push(ToolCall {
            id,
            name,
            arguments,
        });
    }

    Ok(parsed_calls)
}
