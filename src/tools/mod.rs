//! Smartsheet tool catalog
//!
//! Every domain module exposes `register(registrar, client, ..)` and announces
//! its tools through the [`Registrar`] capability. [`register_all`] runs the
//! full sweep in a fixed order; discovery and execution both call it, each
//! with its own registrar.

mod args;
mod descriptor;
mod discussions;
mod folders;
mod registrar;
mod rows;
mod schema;
mod search;
mod sheets;
mod users;
mod workspaces;

use std::sync::Arc;

use serde_json::Value;

pub use args::Arguments;
pub use descriptor::{ToolDescriptor, ToolFuture, ToolHandler};
pub use registrar::{ExecutingRegistrar, RecordingRegistrar, Registrar};
pub use schema::{FieldKind, FieldSchema, ToolSchema};

use crate::Result;
use crate::protocol::ToolCallResult;
use crate::smartsheet::SmartsheetClient;

/// Register every domain tool, in catalog order.
///
/// `allow_delete_tools` is forwarded to the modules that own deletion-capable
/// tools; with it off those tools are never announced.
pub fn register_all(
    registrar: &mut dyn Registrar,
    client: &Arc<SmartsheetClient>,
    allow_delete_tools: bool,
) {
    sheets::register(registrar, client);
    rows::register(registrar, client, allow_delete_tools);
    search::register(registrar, client);
    workspaces::register(registrar, client);
    folders::register(registrar, client);
    users::register(registrar, client);
    discussions::register(registrar, client);
}

/// Wrap an API payload in the MCP text content envelope
pub(crate) fn respond(payload: &Value) -> Result<Value> {
    Ok(serde_json::to_value(ToolCallResult::json(payload))?)
}

/// Query pairs sent to the Smartsheet API
pub(crate) type Query = Vec<(&'static str, String)>;

/// Accepted `pageSize` range (inclusive)
const PAGE_SIZE_RANGE: (f64, f64) = (1.0, 10_000.0);
/// Accepted `page` range (inclusive)
const PAGE_RANGE: (f64, f64) = (1.0, 4_294_967_295.0);

impl ToolSchema {
    /// Declare the optional `pageSize` / `page` fields that [`paging`] reads
    pub(crate) fn paged(
        self,
        size_description: &'static str,
        page_description: &'static str,
    ) -> Self {
        let (min_size, max_size) = PAGE_SIZE_RANGE;
        let (min_page, max_page) = PAGE_RANGE;
        self.field(
            "pageSize",
            FieldSchema::bounded(min_size, max_size)
                .optional()
                .describe(size_description),
        )
        .field(
            "page",
            FieldSchema::bounded(min_page, max_page)
                .optional()
                .describe(page_description),
        )
    }
}

/// Append `pageSize` / `page` query parameters when supplied
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn paging(args: &Arguments, query: &mut Query) -> Result<()> {
    let (min_size, max_size) = PAGE_SIZE_RANGE;
    if let Some(size) = args.opt_number("pageSize", min_size, max_size)? {
        query.push(("pageSize", (size as u64).to_string()));
    }
    let (min_page, max_page) = PAGE_RANGE;
    if let Some(page) = args.opt_number("page", min_page, max_page)? {
        query.push(("page", (page as u64).to_string()));
    }
    Ok(())
}

/// Append a string query parameter when supplied
pub(crate) fn optional_query(
    args: &Arguments,
    name: &'static str,
    query: &mut Query,
) -> Result<()> {
    if let Some(value) = args.opt_string(name)? {
        query.push((name, value));
    }
    Ok(())
}
