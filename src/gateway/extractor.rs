//! Discovery catalog built from a recording sweep

use std::sync::Arc;

use tracing::debug;

use crate::Result;
use crate::protocol::Tool;
use crate::smartsheet::SmartsheetClient;
use crate::tools::{RecordingRegistrar, register_all};

/// Produces tool definitions without touching the Smartsheet API
pub struct ToolDefinitionExtractor {
    placeholder: Arc<SmartsheetClient>,
}

impl ToolDefinitionExtractor {
    /// Create an extractor with its own credential-less client
    pub fn new() -> Result<Self> {
        Ok(Self {
            placeholder: Arc::new(SmartsheetClient::placeholder()?),
        })
    }

    /// Tool definitions in registration order
    #[must_use]
    pub fn extract(&self, allow_delete_tools: bool) -> Vec<Tool> {
        let mut recorder = RecordingRegistrar::new();
        register_all(&mut recorder, &self.placeholder, allow_delete_tools);
        let definitions = recorder.into_definitions();
        debug!(count = definitions.len(), allow_delete_tools, "Extracted tool definitions");
        definitions
    }
}
