//! MCP protocol type definitions

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Tool definition as published by `tools/list` and `GET /tools`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Simplified input JSON Schema
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Content item in a tool call response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    /// Text content
    #[serde(rename = "text")]
    Text {
        /// Text value
        text: String,
    },
}

/// Tool call result envelope returned by domain handlers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    /// Content items
    pub content: Vec<Content>,
    /// Whether result is an error
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolCallResult {
    /// Wrap a JSON payload as pretty-printed text content
    #[must_use]
    pub fn json(payload: &Value) -> Self {
        let text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        Self {
            content: vec![Content::Text { text }],
            is_error: None,
        }
    }
}

/// Implementation info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// Name
    pub name: String,
    /// Version
    pub version: String,
}

/// Server capabilities
///
/// `prompts` and `resources` serialize as explicit `null`; only tools are
/// offered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Tools capability
    pub tools: Option<Value>,
    /// Prompts capability (never offered)
    pub prompts: Option<Value>,
    /// Resources capability (never offered)
    pub resources: Option<Value>,
}

impl ServerCapabilities {
    /// Capabilities of this gateway: tools only
    #[must_use]
    pub fn tools_only() -> Self {
        Self {
            tools: Some(json!({})),
            prompts: None,
            resources: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn capabilities_serialize_null_prompts_and_resources() {
        let value = serde_json::to_value(ServerCapabilities::tools_only()).unwrap();
        assert_eq!(
            value,
            json!({"tools": {}, "prompts": null, "resources": null})
        );
    }

    #[test]
    fn tool_call_result_wraps_pretty_text() {
        let result = ToolCallResult::json(&json!({"id": 1}));
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "{\n  \"id\": 1\n}");
        assert!(value.get("isError").is_none());
    }
}
