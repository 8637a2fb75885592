//! Sheet tools

use std::sync::Arc;

use serde_json::{Map, Value, json};

use super::{
    Arguments, FieldSchema, Query, Registrar, ToolDescriptor, ToolSchema, optional_query,
    paging, respond,
};
use crate::smartsheet::SmartsheetClient;
use crate::{Error, Result};

const INCLUDE_SHEET: &str =
    "Comma-separated optional elements to include (e.g. format,objectValue,rowPermalink)";

const COLUMNS_JSON: &str =
    r#"JSON array of columns, e.g. [{"title":"Task","type":"TEXT_NUMBER","primary":true}]"#;

/// Accepted `destinationType` values for `copy_sheet`
const DESTINATION_TYPES: &[&str] = &["folder", "workspace", "home"];

pub(super) fn register(registrar: &mut dyn Registrar, client: &Arc<SmartsheetClient>) {
    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "get_sheet",
        "Retrieves the current state of a sheet, including rows, columns, and cells",
        ToolSchema::new()
            .field("sheetId", FieldSchema::id().describe("The ID of the sheet to retrieve"))
            .field("include", FieldSchema::string().optional().describe(INCLUDE_SHEET))
            .paged("Number of rows per page", "Which page of rows to return"),
        move |args| async move {
            let args = Arguments::new(args);
            let sheet_id = args.id("sheetId")?;
            let mut query = Query::new();
            optional_query(&args, "include", &mut query)?;
            paging(&args, &mut query)?;
            respond(&api.get(&format!("sheets/{sheet_id}"), &query).await?)
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "get_sheet_version",
        "Gets the latest version number of a sheet; the number increments on every change",
        ToolSchema::new().field("sheetId", FieldSchema::id().describe("The ID of the sheet")),
        move |args| async move {
            let sheet_id = Arguments::new(args).id("sheetId")?;
            respond(&api.get(&format!("sheets/{sheet_id}/version"), &[]).await?)
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "get_columns",
        "Lists the columns of a sheet with their ids, titles and types",
        ToolSchema::new().field("sheetId", FieldSchema::id().describe("The ID of the sheet")),
        move |args| async move {
            let sheet_id = Arguments::new(args).id("sheetId")?;
            respond(&api.get(&format!("sheets/{sheet_id}/columns"), &[]).await?)
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "get_row",
        "Gets a single row of a sheet",
        ToolSchema::new()
            .field("sheetId", FieldSchema::id().describe("The ID of the sheet"))
            .field("rowId", FieldSchema::id().describe("The ID of the row"))
            .field("include", FieldSchema::string().optional().describe(INCLUDE_SHEET)),
        move |args| async move {
            let args = Arguments::new(args);
            let sheet_id = args.id("sheetId")?;
            let row_id = args.id("rowId")?;
            let mut query = Query::new();
            optional_query(&args, "include", &mut query)?;
            respond(
                &api.get(&format!("sheets/{sheet_id}/rows/{row_id}"), &query)
                    .await?,
            )
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "get_cell_history",
        "Retrieves the change history of a single cell",
        ToolSchema::new()
            .field("sheetId", FieldSchema::id().describe("The ID of the sheet"))
            .field("rowId", FieldSchema::id().describe("The ID of the row"))
            .field("columnId", FieldSchema::id().describe("The ID of the column"))
            .field(
                "include",
                FieldSchema::string()
                    .optional()
                    .describe("Optional elements to include (e.g. columnType)"),
            )
            .paged("Number of history entries per page", "Which page to return"),
        move |args| async move {
            let args = Arguments::new(args);
            let sheet_id = args.id("sheetId")?;
            let row_id = args.id("rowId")?;
            let column_id = args.id("columnId")?;
            let mut query = Query::new();
            optional_query(&args, "include", &mut query)?;
            paging(&args, &mut query)?;
            respond(
                &api.get(
                    &format!("sheets/{sheet_id}/rows/{row_id}/columns/{column_id}/history"),
                    &query,
                )
                .await?,
            )
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "copy_sheet",
        "Creates a copy of a sheet in a folder, workspace, or the user's home",
        ToolSchema::new()
            .field("sheetId", FieldSchema::id().describe("The ID of the sheet to copy"))
            .field(
                "destinationType",
                FieldSchema::one_of(DESTINATION_TYPES)
                    .describe("Where to place the copy: folder, workspace, or home"),
            )
            .field(
                "destinationId",
                FieldSchema::id()
                    .optional()
                    .describe("ID of the destination folder or workspace (omit for home)"),
            )
            .field("newName", FieldSchema::string().describe("Name of the new sheet"))
            .field(
                "include",
                FieldSchema::string()
                    .optional()
                    .describe("Elements to copy (e.g. data,attachments,discussions)"),
            ),
        move |args| async move {
            let args = Arguments::new(args);
            let sheet_id = args.id("sheetId")?;
            let destination_type = args
                .opt_choice("destinationType", DESTINATION_TYPES)?
                .unwrap_or_else(|| "home".to_string());
            let destination_id = args.opt_id("destinationId")?;
            if destination_type != "home" && destination_id.is_none() {
                return Err(Error::InvalidArguments(format!(
                    "'destinationId' is required when copying to a {destination_type}"
                )));
            }

            let mut body = Map::new();
            body.insert("destinationType".into(), json!(destination_type));
            if let Some(id) = destination_id {
                body.insert("destinationId".into(), json!(id));
            }
            body.insert("newName".into(), json!(args.string("newName")?));

            let mut query = Query::new();
            optional_query(&args, "include", &mut query)?;
            respond(
                &api.post_with_query(
                    &format!("sheets/{sheet_id}/copy"),
                    &query,
                    &Value::Object(body),
                )
                .await?,
            )
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "create_sheet",
        "Creates a new sheet in the user's home, a folder, or a workspace",
        ToolSchema::new()
            .field("name", FieldSchema::string().describe("Name of the new sheet"))
            .field(
                "columns",
                FieldSchema::array().describe(COLUMNS_JSON),
            )
            .field(
                "folderId",
                FieldSchema::id()
                    .optional()
                    .describe("Folder to create the sheet in (optional)"),
            )
            .field(
                "workspaceId",
                FieldSchema::id()
                    .optional()
                    .describe("Workspace to create the sheet in (optional)"),
            ),
        move |args| async move {
            let args = Arguments::new(args);
            let path = sheet_container(&args)?;
            let body = json!({
                "name": args.string("name")?,
                "columns": args.json("columns")?,
            });
            respond(&api.post(&path, &body).await?)
        },
    ));
}

/// Collection path a new sheet is posted to
fn sheet_container(args: &Arguments) -> Result<String> {
    match (args.opt_id("folderId")?, args.opt_id("workspaceId")?) {
        (Some(_), Some(_)) => Err(Error::InvalidArguments(
            "Specify at most one of 'folderId' and 'workspaceId'".to_string(),
        )),
        (Some(folder), None) => Ok(format!("folders/{folder}/sheets")),
        (None, Some(workspace)) => Ok(format!("workspaces/{workspace}/sheets")),
        (None, None) => Ok("sheets".to_string()),
    }
}
