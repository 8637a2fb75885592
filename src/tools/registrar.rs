//! Registrar capability and its two implementations
//!
//! Domain modules announce their tools through `&mut dyn Registrar` and never
//! see which implementation receives them:
//!
//! - [`RecordingRegistrar`] keeps the discovery projection and drops the
//!   handler, so a credential-less client is safe to register against.
//! - [`ExecutingRegistrar`] invokes the handler whose name matches the
//!   requested tool and ignores the rest.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use super::descriptor::{ToolDescriptor, ToolFuture};
use crate::protocol::Tool;
use crate::{Error, Result};

/// Accepts tool descriptors during a registration sweep
pub trait Registrar {
    /// Announce one tool
    fn register(&mut self, descriptor: ToolDescriptor);
}

/// Collects tool definitions in registration order; never runs a handler
#[derive(Debug, Default)]
pub struct RecordingRegistrar {
    definitions: Vec<Tool>,
    seen: HashSet<&'static str>,
}

impl RecordingRegistrar {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded definitions, in registration order
    #[must_use]
    pub fn into_definitions(self) -> Vec<Tool> {
        self.definitions
    }
}

impl Registrar for RecordingRegistrar {
    fn register(&mut self, descriptor: ToolDescriptor) {
        if !self.seen.insert(descriptor.name) {
            warn!(tool = descriptor.name, "Duplicate tool registration ignored");
            return;
        }
        self.definitions.push(descriptor.definition());
        // handler dropped here unrun
    }
}

/// Invokes the handler of exactly one named tool.
///
/// Registration keeps going after a match; every tool is always announced.
pub struct ExecutingRegistrar {
    tool_name: String,
    arguments: Option<Value>,
    pending: Option<ToolFuture>,
    registered: usize,
}

impl ExecutingRegistrar {
    /// Create a registrar looking for `tool_name`
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: Some(arguments),
            pending: None,
            registered: 0,
        }
    }

    /// Whether a handler matched so far
    #[must_use]
    pub fn matched(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of descriptors seen
    #[must_use]
    pub fn registered(&self) -> usize {
        self.registered
    }

    /// Await the matched handler, or fail with `ToolNotFound`
    pub async fn finish(self) -> Result<Value> {
        match self.pending {
            Some(pending) => pending.await,
            None => Err(Error::ToolNotFound(self.tool_name)),
        }
    }
}

impl Registrar for ExecutingRegistrar {
    fn register(&mut self, descriptor: ToolDescriptor) {
        self.registered += 1;
        if descriptor.name != self.tool_name {
            return;
        }
        // Arguments are consumed by the first match; names are unique per sweep
        let Some(arguments) = self.arguments.take() else {
            warn!(tool = descriptor.name, "Duplicate tool registration ignored");
            return;
        };
        debug!(tool = descriptor.name, "Invoking tool handler");
        self.pending = Some((descriptor.handler)(arguments));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::schema::{FieldSchema, ToolSchema};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_tool(name: &'static str, calls: &Arc<AtomicUsize>) -> ToolDescriptor {
        let calls = Arc::clone(calls);
        ToolDescriptor::new(
            name,
            "counts invocations",
            ToolSchema::new().field("value", FieldSchema::string().describe("Echoed value")),
            move |args| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!({ "echo": args }))
            },
        )
    }

    fn sweep(registrar: &mut dyn Registrar, calls: &Arc<AtomicUsize>) {
        registrar.register(counting_tool("alpha", calls));
        registrar.register(counting_tool("beta", calls));
        registrar.register(counting_tool("gamma", calls));
    }

    #[tokio::test]
    async fn recording_never_invokes_handlers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut recorder = RecordingRegistrar::new();
        sweep(&mut recorder, &calls);

        let names: Vec<_> = recorder
            .into_definitions()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn recording_applies_schema_projection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut recorder = RecordingRegistrar::new();
        recorder.register(counting_tool("alpha", &calls));
        let tool = &recorder.into_definitions()[0];
        assert_eq!(tool.input_schema["required"], json!(["value"]));
        assert_eq!(tool.input_schema["properties"]["value"]["type"], "string");
    }

    #[test]
    fn recording_skips_duplicate_names() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut recorder = RecordingRegistrar::new();
        recorder.register(counting_tool("alpha", &calls));
        recorder.register(counting_tool("alpha", &calls));
        assert_eq!(recorder.into_definitions().len(), 1);
    }

    #[tokio::test]
    async fn executing_invokes_only_the_match_and_keeps_registering() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut executor = ExecutingRegistrar::new("beta", json!({"value": "x"}));
        sweep(&mut executor, &calls);

        assert!(executor.matched());
        assert_eq!(executor.registered(), 3);
        let result = executor.finish().await.unwrap();
        assert_eq!(result, json!({"echo": {"value": "x"}}));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn executing_without_match_is_tool_not_found() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut executor = ExecutingRegistrar::new("nonexistent_tool", json!({}));
        sweep(&mut executor, &calls);

        let err = executor.finish().await.unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(ref n) if n == "nonexistent_tool"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handler_errors_pass_through() {
        let mut executor = ExecutingRegistrar::new("fails", json!({}));
        executor.register(ToolDescriptor::new(
            "fails",
            "always fails",
            ToolSchema::new(),
            |_args| async { Err(Error::InvalidArguments("nope".into())) },
        ));
        let err = executor.finish().await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid arguments: nope");
    }
}
