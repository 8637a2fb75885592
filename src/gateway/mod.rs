//! Gateway server implementation

pub mod auth;
pub mod engine;
pub mod extractor;
mod router;
mod server;

pub use auth::{AuthDecision, AuthGate, AuthRejection, SECRET_KEY_HEADER};
pub use engine::{ExecutionRequest, ToolExecutionEngine};
pub use extractor::ToolDefinitionExtractor;
pub use router::{
    ALLOW_DELETE_HEADER, API_KEY_HEADER, AppState, ENDPOINT_HEADER, SERVER_NAME, create_router,
};
pub use server::Gateway;
