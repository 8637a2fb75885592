//! Error types for the Smartsheet MCP Gateway

use std::io;

use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, Error>;

/// Gateway errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required request parameter or header missing
    #[error("{0}")]
    InvalidParams(String),

    /// Unknown JSON-RPC method
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// No registered tool carries the requested name
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Failure while running a `tools/call` request
    #[error("Tool execution error: {0}")]
    ToolExecution(Box<Error>),

    /// Tool arguments rejected by a handler
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Smartsheet API returned a non-success status
    #[error("Smartsheet API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap an error raised while executing a tool
    #[must_use]
    pub fn tool_execution(inner: Self) -> Self {
        Self::ToolExecution(Box::new(inner))
    }

    /// Convert to JSON-RPC error code
    #[must_use]
    pub fn to_rpc_code(&self) -> i32 {
        match self {
            Self::InvalidParams(_) => rpc_codes::INVALID_PARAMS,
            Self::MethodNotFound(_) => rpc_codes::METHOD_NOT_FOUND,
            // Tool failures (including unknown tools) surface as internal errors
            _ => rpc_codes::INTERNAL_ERROR,
        }
    }
}

/// JSON-RPC error codes used by the gateway
pub mod rpc_codes {
    /// Parse error - Invalid JSON
    pub const PARSE_ERROR: i32 = -32700;
    /// Method not found
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Missing or invalid shared secret on `tools/call`
    pub const AUTH_ERROR: i32 = -32001;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tool_not_found_message_is_wrapped_for_execution() {
        let err = Error::tool_execution(Error::ToolNotFound("nonexistent_tool".to_string()));
        assert_eq!(
            err.to_string(),
            "Tool execution error: Tool not found: nonexistent_tool"
        );
        assert_eq!(err.to_rpc_code(), rpc_codes::INTERNAL_ERROR);
    }

    #[test]
    fn rpc_codes_by_variant() {
        assert_eq!(
            Error::InvalidParams("x".into()).to_rpc_code(),
            rpc_codes::INVALID_PARAMS
        );
        assert_eq!(
            Error::MethodNotFound("x".into()).to_rpc_code(),
            rpc_codes::METHOD_NOT_FOUND
        );
        assert_eq!(
            Error::Api {
                status: 404,
                message: "gone".into()
            }
            .to_rpc_code(),
            rpc_codes::INTERNAL_ERROR
        );
    }
}
