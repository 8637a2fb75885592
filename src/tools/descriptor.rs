//! Tool descriptors announced by domain modules

use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use super::schema::ToolSchema;
use crate::Result;
use crate::protocol::Tool;

/// Pending result of one handler invocation
pub type ToolFuture = BoxFuture<'static, Result<Value>>;

/// One-shot handler: takes the call arguments, yields the tool result
pub type ToolHandler = Box<dyn FnOnce(Value) -> ToolFuture + Send>;

/// A named, schema-described operation plus the handler that runs it.
///
/// Descriptors are rebuilt for every registration sweep; none outlives the
/// request that created it.
pub struct ToolDescriptor {
    /// Tool name, unique within one sweep
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Declared argument schema
    pub schema: ToolSchema,
    /// Handler (consumed on invocation)
    pub handler: ToolHandler,
}

impl ToolDescriptor {
    /// Build a descriptor from an async handler
    pub fn new<F, Fut>(
        name: &'static str,
        description: &'static str,
        schema: ToolSchema,
        handler: F,
    ) -> Self
    where
        F: FnOnce(Value) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            name,
            description,
            schema,
            handler: Box::new(move |args| handler(args).boxed()),
        }
    }

    /// Discovery-facing projection (handler is not carried over)
    #[must_use]
    pub fn definition(&self) -> Tool {
        Tool {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.schema.to_discovery_schema(),
        }
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
