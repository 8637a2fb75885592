//! Search tools

use std::sync::Arc;

use super::{
    Arguments, FieldSchema, Query, Registrar, ToolDescriptor, ToolSchema, optional_query, respond,
};
use crate::smartsheet::SmartsheetClient;

pub(super) fn register(registrar: &mut dyn Registrar, client: &Arc<SmartsheetClient>) {
    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "search_sheets",
        "Searches all sheets the user can access for the given text",
        ToolSchema::new()
            .field("query", FieldSchema::string().describe("Text to search for"))
            .field(
                "scopes",
                FieldSchema::string()
                    .optional()
                    .describe("Comma-separated search scopes (e.g. cellData,sheetNames)"),
            ),
        move |args| async move {
            let args = Arguments::new(args);
            let mut query: Query = vec![("query", args.string("query")?)];
            optional_query(&args, "scopes", &mut query)?;
            respond(&api.get("search", &query).await?)
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "search_in_sheet",
        "Searches a single sheet for the given text",
        ToolSchema::new()
            .field("sheetId", FieldSchema::id().describe("The ID of the sheet to search"))
            .field("query", FieldSchema::string().describe("Text to search for")),
        move |args| async move {
            let args = Arguments::new(args);
            let sheet_id = args.id("sheetId")?;
            let query: Query = vec![("query", args.string("query")?)];
            respond(&api.get(&format!("search/sheets/{sheet_id}"), &query).await?)
        },
    ));
}
