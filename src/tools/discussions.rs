//! Discussion tools

use std::sync::Arc;

use serde_json::json;

use super::{Arguments, FieldSchema, Query, Registrar, ToolDescriptor, ToolSchema, paging, respond};
use crate::smartsheet::SmartsheetClient;

pub(super) fn register(registrar: &mut dyn Registrar, client: &Arc<SmartsheetClient>) {
    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "get_discussions_by_sheet_id",
        "Lists the discussions on a sheet together with their comments",
        ToolSchema::new()
            .field("sheetId", FieldSchema::id().describe("The ID of the sheet"))
            .paged("Number of discussions per page", "Which page to return"),
        move |args| async move {
            let args = Arguments::new(args);
            let sheet_id = args.id("sheetId")?;
            let mut query: Query = vec![("include", "comments".to_string())];
            paging(&args, &mut query)?;
            respond(
                &api.get(&format!("sheets/{sheet_id}/discussions"), &query)
                    .await?,
            )
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "create_sheet_discussion",
        "Starts a new discussion on a sheet with an initial comment",
        ToolSchema::new()
            .field("sheetId", FieldSchema::id().describe("The ID of the sheet"))
            .field(
                "commentText",
                FieldSchema::string().describe("Text of the first comment"),
            ),
        move |args| async move {
            let args = Arguments::new(args);
            let sheet_id = args.id("sheetId")?;
            let body = json!({ "comment": { "text": args.string("commentText")? } });
            respond(
                &api.post(&format!("sheets/{sheet_id}/discussions"), &body)
                    .await?,
            )
        },
    ));
}
