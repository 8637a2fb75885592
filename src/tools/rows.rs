//! Row tools; deletion is only announced when explicitly allowed

use std::sync::Arc;

use serde_json::{Value, json};

use super::{Arguments, FieldSchema, Registrar, ToolDescriptor, ToolSchema, respond};
use crate::smartsheet::SmartsheetClient;
use crate::{Error, Result};

const ROWS_JSON: &str = "JSON array of row objects, each with a cells array of {columnId, value}";

pub(super) fn register(
    registrar: &mut dyn Registrar,
    client: &Arc<SmartsheetClient>,
    allow_delete_tools: bool,
) {
    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "add_rows",
        "Adds new rows to a sheet",
        ToolSchema::new()
            .field("sheetId", FieldSchema::id().describe("The ID of the sheet"))
            .field("rows", FieldSchema::array().describe(ROWS_JSON)),
        move |args| async move {
            let args = Arguments::new(args);
            let sheet_id = args.id("sheetId")?;
            let rows = row_array(&args)?;
            respond(&api.post(&format!("sheets/{sheet_id}/rows"), &rows).await?)
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "update_rows",
        "Updates existing rows of a sheet; every row object must carry its id",
        ToolSchema::new()
            .field("sheetId", FieldSchema::id().describe("The ID of the sheet"))
            .field("rows", FieldSchema::array().describe(ROWS_JSON)),
        move |args| async move {
            let args = Arguments::new(args);
            let sheet_id = args.id("sheetId")?;
            let rows = row_array(&args)?;
            if let Some(index) = rows
                .as_array()
                .and_then(|rows| rows.iter().position(|row| row.get("id").is_none()))
            {
                return Err(Error::InvalidArguments(format!(
                    "row at index {index} has no 'id'"
                )));
            }
            respond(&api.put(&format!("sheets/{sheet_id}/rows"), &rows).await?)
        },
    ));

    if !allow_delete_tools {
        return;
    }

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "delete_rows",
        "Permanently deletes rows from a sheet",
        ToolSchema::new()
            .field("sheetId", FieldSchema::id().describe("The ID of the sheet"))
            .field(
                "rowIds",
                FieldSchema::array()
                    .describe("IDs of the rows to delete (JSON array or comma-separated)"),
            )
            .field(
                "ignoreRowsNotFound",
                FieldSchema::boolean()
                    .optional()
                    .describe("If true, unknown row ids are skipped instead of failing the call"),
            ),
        move |args| async move {
            let args = Arguments::new(args);
            let sheet_id = args.id("sheetId")?;
            let ids = args.ids("rowIds")?;
            if ids.is_empty() {
                return Err(Error::InvalidArguments("'rowIds' must not be empty".into()));
            }
            let ignore = args.opt_bool("ignoreRowsNotFound")?.unwrap_or(false);
            let query = vec![
                (
                    "ids",
                    ids.iter().map(u64::to_string).collect::<Vec<_>>().join(","),
                ),
                ("ignoreRowsNotFound", ignore.to_string()),
            ];
            respond(&api.delete(&format!("sheets/{sheet_id}/rows"), &query).await?)
        },
    ));
}

/// The `rows` argument as a non-empty JSON array
fn row_array(args: &Arguments) -> Result<Value> {
    match args.json("rows")? {
        Value::Array(rows) if !rows.is_empty() => Ok(Value::Array(rows)),
        Value::Array(_) => Err(Error::InvalidArguments("'rows' must not be empty".into())),
        single @ Value::Object(_) => Ok(json!([single])),
        _ => Err(Error::InvalidArguments("'rows' must be a JSON array".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn row_array_accepts_text_and_single_object() {
        let args = Arguments::new(json!({"rows": "[{\"cells\": []}]"}));
        assert_eq!(row_array(&args).unwrap(), json!([{"cells": []}]));

        let args = Arguments::new(json!({"rows": {"id": 1}}));
        assert_eq!(row_array(&args).unwrap(), json!([{"id": 1}]));
    }

    #[test]
    fn row_array_rejects_empty_and_scalars() {
        assert!(row_array(&Arguments::new(json!({"rows": []}))).is_err());
        assert!(row_array(&Arguments::new(json!({"rows": 5}))).is_err());
        assert!(row_array(&Arguments::new(json!({}))).is_err());
    }

    #[tokio::test]
    async fn update_rows_requires_row_ids() {
        use crate::tools::ExecutingRegistrar;

        let client = Arc::new(SmartsheetClient::new("token", None).unwrap());
        let mut executor = ExecutingRegistrar::new(
            "update_rows",
            json!({"sheetId": 1, "rows": [{"cells": []}]}),
        );
        register(&mut executor, &client, false);
        let err = executor.finish().await.unwrap_err();
        assert!(err.to_string().contains("index 0"));
    }
}
