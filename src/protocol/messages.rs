//! MCP JSON-RPC message types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Info, ServerCapabilities, Tool};

/// JSON-RPC request
///
/// Built leniently from a decoded JSON object: a missing or non-string
/// `method` is kept as `None` so the router can answer with
/// `Method not found` instead of rejecting the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Method name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Parameters (defaults to an empty object)
    #[serde(default = "empty_object")]
    pub params: Value,
    /// Request ID, echoed verbatim in the response (`null` when absent)
    #[serde(default)]
    pub id: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl JsonRpcRequest {
    /// Create a request (used by tests and clients)
    pub fn new(method: impl Into<String>, params: Value, id: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: Some(method.into()),
            params,
            id,
        }
    }

    /// Read the envelope fields out of a decoded JSON object
    #[must_use]
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let params = match object.get("params") {
            None | Some(Value::Null) => empty_object(),
            Some(p) => p.clone(),
        };

        Self {
            jsonrpc: object
                .get("jsonrpc")
                .and_then(Value::as_str)
                .unwrap_or("2.0")
                .to_string(),
            method: object
                .get("method")
                .and_then(Value::as_str)
                .map(String::from),
            params,
            id: object.get("id").cloned().unwrap_or(Value::Null),
        }
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error (on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// Request ID; always present, `null` when the request had none
    #[serde(default)]
    pub id: Value,
}

impl JsonRpcResponse {
    /// Create a success response
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response
    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }
}

/// JSON-RPC error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Optional error data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// ============================================================================
// Initialize
// ============================================================================

/// Initialize result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    /// Protocol version
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server capabilities
    pub capabilities: ServerCapabilities,
    /// Server info
    #[serde(rename = "serverInfo")]
    pub server_info: Info,
}

// ============================================================================
// Tools
// ============================================================================

/// Tools list result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsListResult {
    /// List of tools
    pub tools: Vec<Tool>,
}

/// Tools call request params
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCallParams {
    /// Tool name
    #[serde(default)]
    pub name: String,
    /// Tool arguments
    #[serde(default = "empty_object")]
    pub arguments: Value,
}

impl ToolsCallParams {
    /// Extract name and arguments from `tools/call` params.
    ///
    /// Missing fields fall back to `""` and `{}` so callers never deal with
    /// `Option`; an unknown empty name is reported as tool-not-found later.
    #[must_use]
    pub fn from_params(params: &Value) -> Self {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => empty_object(),
            Some(a) => a.clone(),
        };
        Self { name, arguments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: &Value) -> &Map<String, Value> {
        value.as_object().unwrap()
    }

    #[test]
    fn from_object_reads_all_fields() {
        let raw = json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {"name": "get_sheet"},
            "id": "req-1"
        });
        let req = JsonRpcRequest::from_object(object(&raw));
        assert_eq!(req.method.as_deref(), Some("tools/call"));
        assert_eq!(req.params, json!({"name": "get_sheet"}));
        assert_eq!(req.id, json!("req-1"));
    }

    #[test]
    fn from_object_defaults_params_and_id() {
        let raw = json!({"jsonrpc": "2.0", "method": "initialize"});
        let req = JsonRpcRequest::from_object(object(&raw));
        assert_eq!(req.params, json!({}));
        assert_eq!(req.id, Value::Null);
    }

    #[test]
    fn from_object_keeps_unusual_ids_verbatim() {
        for id in [json!(0), json!(-7), json!(1.5), json!({"k": 1}), json!([1])] {
            let raw = json!({"method": "initialize", "id": id.clone()});
            assert_eq!(JsonRpcRequest::from_object(object(&raw)).id, id);
        }
    }

    #[test]
    fn from_object_non_string_method_is_none() {
        let raw = json!({"jsonrpc": "2.0", "method": 42, "id": 1});
        assert!(JsonRpcRequest::from_object(object(&raw)).method.is_none());
    }

    #[test]
    fn response_always_serializes_id() {
        let resp = JsonRpcResponse::error(Value::Null, -32700, "Parse error");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "error": {"code": -32700, "message": "Parse error"},
                "id": null
            })
        );

        let ok = serde_json::to_value(JsonRpcResponse::success(json!(5), json!({}))).unwrap();
        assert_eq!(ok["id"], json!(5));
        assert!(ok.get("error").is_none());
    }

    #[test]
    fn tools_call_params_defaults() {
        let p = ToolsCallParams::from_params(&json!({}));
        assert_eq!(p.name, "");
        assert_eq!(p.arguments, json!({}));

        let p = ToolsCallParams::from_params(&json!({"name": "x", "arguments": {"a": 1}}));
        assert_eq!(p.name, "x");
        assert_eq!(p.arguments, json!({"a": 1}));
    }
}
