//! Single-tool execution against a cached Smartsheet client

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{ClientCache, CredentialKey, normalize_endpoint};
use crate::smartsheet::SmartsheetClient;
use crate::tools::{ExecutingRegistrar, register_all};
use crate::{Error, Result};

/// Everything needed to run one `tools/call`
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    /// Smartsheet API key
    pub api_key: String,
    /// Smartsheet endpoint (`None` for the default)
    pub endpoint: Option<String>,
    /// Whether deletion tools are registered
    pub allow_delete_tools: bool,
    /// Requested tool
    pub tool_name: String,
    /// Raw tool arguments, passed through unvalidated
    pub arguments: Value,
}

/// Runs exactly one named tool per call
pub struct ToolExecutionEngine {
    cache: Arc<ClientCache<SmartsheetClient>>,
    default_endpoint: String,
}

impl ToolExecutionEngine {
    /// Create an engine over a shared client cache
    pub fn new(
        cache: Arc<ClientCache<SmartsheetClient>>,
        default_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            default_endpoint: default_endpoint.into(),
        }
    }

    /// Client cache used by this engine
    #[must_use]
    pub fn cache(&self) -> &Arc<ClientCache<SmartsheetClient>> {
        &self.cache
    }

    /// Resolve the client, run the executing sweep and await the match.
    ///
    /// Every failure comes back wrapped in [`Error::ToolExecution`].
    pub async fn execute(&self, request: ExecutionRequest) -> Result<Value> {
        self.run(request).await.map_err(Error::tool_execution)
    }

    async fn run(&self, request: ExecutionRequest) -> Result<Value> {
        let endpoint = normalize_endpoint(Some(
            request.endpoint.as_deref().unwrap_or(&self.default_endpoint),
        ));
        let key = CredentialKey::derive(&request.api_key, Some(&endpoint));
        let client = self.cache.get_or_create(&key, || {
            SmartsheetClient::new(request.api_key.clone(), Some(&endpoint))
        })?;

        let mut executor = ExecutingRegistrar::new(request.tool_name.as_str(), request.arguments);
        register_all(&mut executor, &client, request.allow_delete_tools);
        debug!(
            tool = %request.tool_name,
            credential = %key,
            registered = executor.registered(),
            matched = executor.matched(),
            "Registration sweep complete"
        );

        let result = executor.finish().await?;
        info!(tool = %request.tool_name, credential = %key, "Tool executed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DEFAULT_ENDPOINT;
    use serde_json::json;

    fn engine(capacity: usize) -> ToolExecutionEngine {
        ToolExecutionEngine::new(Arc::new(ClientCache::new(capacity)), DEFAULT_ENDPOINT)
    }

    fn request(api_key: &str, tool: &str) -> ExecutionRequest {
        ExecutionRequest {
            api_key: api_key.to_string(),
            endpoint: None,
            allow_delete_tools: false,
            tool_name: tool.to_string(),
            arguments: json!({}),
        }
    }

    #[tokio::test]
    async fn unknown_tool_reports_not_found() {
        let engine = engine(10);
        let err = engine
            .execute(request("key", "nonexistent_tool"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Tool execution error: Tool not found: nonexistent_tool"
        );
    }

    #[tokio::test]
    async fn delete_tool_hidden_without_flag() {
        let engine = engine(10);
        let err = engine.execute(request("key", "delete_rows")).await.unwrap_err();
        assert!(err.to_string().contains("Tool not found: delete_rows"));
    }

    #[tokio::test]
    async fn client_is_reused_per_credential() {
        let engine = engine(10);
        engine.execute(request("a", "nonexistent_tool")).await.ok();
        engine.execute(request("a", "nonexistent_tool")).await.ok();
        engine.execute(request("b", "nonexistent_tool")).await.ok();

        let stats = engine.cache().stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn default_and_explicit_default_endpoint_share_a_client() {
        let engine = engine(10);
        engine.execute(request("a", "x")).await.ok();
        let mut explicit = request("a", "x");
        explicit.endpoint = Some(format!("{DEFAULT_ENDPOINT}/"));
        engine.execute(explicit).await.ok();
        assert_eq!(engine.cache().len(), 1);
    }

    #[tokio::test]
    async fn invalid_endpoint_fails_without_caching() {
        let engine = engine(10);
        let mut bad = request("a", "get_current_user");
        bad.endpoint = Some("not a url".into());
        let err = engine.execute(bad).await.unwrap_err();
        assert!(err.to_string().starts_with("Tool execution error: Configuration error"));
        assert!(engine.cache().is_empty());
    }

    #[tokio::test]
    async fn handler_argument_errors_are_wrapped() {
        let engine = engine(10);
        let err = engine.execute(request("a", "get_sheet")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Tool execution error: Invalid arguments: 'sheetId' is required"
        );
    }
}
