//! HTTP router and JSON-RPC dispatch

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, HeaderValue, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde_json::{Value, json};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::auth::{AuthDecision, AuthGate, SECRET_KEY_HEADER};
use super::engine::{ExecutionRequest, ToolExecutionEngine};
use super::extractor::ToolDefinitionExtractor;
use crate::cache::ClientCache;
use crate::config::Config;
use crate::error::rpc_codes;
use crate::protocol::{
    Info, InitializeResult, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION,
    ServerCapabilities, ToolsCallParams, ToolsListResult,
};
use crate::smartsheet::SmartsheetClient;
use crate::{Error, Result};

/// Header carrying the caller's Smartsheet API key
pub const API_KEY_HEADER: &str = "x-smartsheet-api-key";
/// Header overriding the Smartsheet endpoint
pub const ENDPOINT_HEADER: &str = "x-smartsheet-endpoint";
/// Header enabling deletion tools (`"true"`)
pub const ALLOW_DELETE_HEADER: &str = "x-allow-delete-tools";

/// Name announced in `serverInfo`
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

/// Shared application state
pub struct AppState {
    /// Shared-secret gate for `tools/call`
    pub auth: AuthGate,
    /// Discovery catalog builder
    pub extractor: ToolDefinitionExtractor,
    /// Tool runner (owns the client cache)
    pub engine: ToolExecutionEngine,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Whether CORS is enabled
    pub cors: bool,
    /// Process start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build state from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = Arc::new(ClientCache::with_policy(
            config.cache.capacity,
            config.cache.eviction,
        ));
        Ok(Self {
            auth: AuthGate::from_config(&config.auth),
            extractor: ToolDefinitionExtractor::new()?,
            engine: ToolExecutionEngine::new(cache, config.smartsheet.default_endpoint.clone()),
            max_body_size: config.server.max_body_size,
            cors: config.server.cors,
            started_at: Utc::now(),
        })
    }

    /// Client cache shared by all tool calls
    #[must_use]
    pub fn cache(&self) -> &Arc<ClientCache<SmartsheetClient>> {
        self.engine.cache()
    }
}

/// UUID v4 request ids for `x-request-id`
#[derive(Debug, Clone, Copy, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Uuid::new_v4().to_string().parse().ok().map(RequestId::new)
    }
}

/// Create the router
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_body_size;
    let cors = state.cors;

    let router = Router::new()
        .route("/", get(service_info_handler))
        .route("/health", get(health_handler))
        .route("/tools", get(tools_handler))
        .route("/mcp", post(mcp_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// GET / - service metadata
async fn service_info_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "protocol": "JSON-RPC 2.0",
        "protocolVersion": PROTOCOL_VERSION,
        "endpoints": {
            "mcp": "POST /mcp",
            "tools": "GET /tools",
            "health": "GET /health"
        },
        "headers": {
            "apiKey": API_KEY_HEADER,
            "endpoint": ENDPOINT_HEADER,
            "allowDeleteTools": ALLOW_DELETE_HEADER,
            "secretKey": SECRET_KEY_HEADER
        },
        "authentication": {
            "required": state.auth.is_enforced(),
            "appliesTo": ["tools/call"]
        }
    }))
}

/// GET /health - liveness/readiness
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let now = Utc::now();
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": now.to_rfc3339(),
        "uptimeSeconds": (now - state.started_at).num_seconds(),
        "cache": state.cache().stats()
    }))
}

/// GET /tools - discovery catalog, deletion tools excluded
async fn tools_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let tools = state.extractor.extract(false);
    Json(json!({
        "count": tools.len(),
        "tools": tools
    }))
}

/// Unknown paths
async fn not_found_handler(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "path": uri.path()
        })),
    )
}

/// POST /mcp - JSON-RPC endpoint
async fn mcp_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = match parse_envelope(&body) {
        Ok(request) => request,
        Err(response) => return rpc_response(StatusCode::OK, response),
    };

    let method = request.method.as_deref().unwrap_or_default();
    debug!(method = %method, id = %request.id, "JSON-RPC request");

    let secret = headers.get(SECRET_KEY_HEADER).map(HeaderValue::as_bytes);
    if let AuthDecision::Reject(reason) = state.auth.check(method, secret) {
        warn!(method = %method, reason = ?reason, "Rejected unauthenticated tool call");
        return rpc_response(
            StatusCode::UNAUTHORIZED,
            JsonRpcResponse::error(request.id, rpc_codes::AUTH_ERROR, reason.message()),
        );
    }

    let outcome = AssertUnwindSafe(dispatch(&state, &headers, &request))
        .catch_unwind()
        .await;

    let response = match outcome {
        Ok(Ok(result)) => JsonRpcResponse::success(request.id, result),
        Ok(Err(e)) => {
            match e {
                Error::MethodNotFound(_) => debug!(method = %method, "Unknown method"),
                Error::InvalidParams(_) => warn!(method = %method, error = %e, "Invalid params"),
                _ => error!(method = %method, error = %e, "Request failed"),
            }
            JsonRpcResponse::error(request.id, e.to_rpc_code(), e.to_string())
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(method = %method, panic = %message, "Handler panicked");
            JsonRpcResponse::error(
                request.id,
                rpc_codes::INTERNAL_ERROR,
                Error::Internal(message).to_string(),
            )
        }
    };

    rpc_response(StatusCode::OK, response)
}

/// Route one parsed request to its handler
async fn dispatch(
    state: &AppState,
    headers: &HeaderMap,
    request: &JsonRpcRequest,
) -> Result<Value> {
    let method = request.method.as_deref().unwrap_or_default();
    match method {
        "initialize" => Ok(serde_json::to_value(initialize_result())?),
        "tools/list" => {
            let tools = state.extractor.extract(allow_delete_tools(headers));
            Ok(serde_json::to_value(ToolsListResult { tools })?)
        }
        "tools/call" => {
            let api_key = header_str(headers, API_KEY_HEADER)
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    Error::InvalidParams(format!(
                        "Smartsheet API key required in {API_KEY_HEADER} header"
                    ))
                })?;
            let call = ToolsCallParams::from_params(&request.params);

            state
                .engine
                .execute(ExecutionRequest {
                    api_key: api_key.to_string(),
                    endpoint: header_str(headers, ENDPOINT_HEADER)
                        .filter(|e| !e.trim().is_empty())
                        .map(String::from),
                    allow_delete_tools: allow_delete_tools(headers),
                    tool_name: call.name,
                    arguments: call.arguments,
                })
                .await
        }
        #[cfg(test)]
        "test/panic" => panic!("handler exploded"),
        other => Err(Error::MethodNotFound(other.to_string())),
    }
}

/// Static `initialize` result
fn initialize_result() -> InitializeResult {
    InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities::tools_only(),
        server_info: Info {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    }
}

/// Decode the body into a request envelope.
///
/// Anything other than a JSON object is a parse error answered with `id: null`.
#[allow(clippy::result_large_err)] // JsonRpcResponse used directly as the error body
fn parse_envelope(body: &[u8]) -> std::result::Result<JsonRpcRequest, JsonRpcResponse> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(JsonRpcRequest::from_object(&object)),
        Ok(_) => Err(JsonRpcResponse::error(
            Value::Null,
            rpc_codes::PARSE_ERROR,
            "Parse error: request body must be a JSON object",
        )),
        Err(e) => Err(JsonRpcResponse::error(
            Value::Null,
            rpc_codes::PARSE_ERROR,
            format!("Parse error: {e}"),
        )),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn allow_delete_tools(headers: &HeaderMap) -> bool {
    header_str(headers, ALLOW_DELETE_HEADER).is_some_and(|v| v.trim() == "true")
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

fn rpc_response(status: StatusCode, rpc: JsonRpcResponse) -> Response {
    (status, Json(rpc)).into_response()
}
