//! Workspace tools

use std::sync::Arc;

use serde_json::json;

use super::{Arguments, FieldSchema, Query, Registrar, ToolDescriptor, ToolSchema, paging, respond};
use crate::smartsheet::SmartsheetClient;

pub(super) fn register(registrar: &mut dyn Registrar, client: &Arc<SmartsheetClient>) {
    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "get_workspaces",
        "Lists the workspaces the user can access",
        ToolSchema::new()
            .paged("Number of workspaces per page", "Which page to return"),
        move |args| async move {
            let args = Arguments::new(args);
            let mut query = Query::new();
            paging(&args, &mut query)?;
            respond(&api.get("workspaces", &query).await?)
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "get_workspace",
        "Gets a workspace and its top-level contents",
        ToolSchema::new().field(
            "workspaceId",
            FieldSchema::id().describe("The ID of the workspace"),
        ),
        move |args| async move {
            let workspace_id = Arguments::new(args).id("workspaceId")?;
            respond(&api.get(&format!("workspaces/{workspace_id}"), &[]).await?)
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "create_workspace",
        "Creates a new workspace",
        ToolSchema::new().field(
            "workspaceName",
            FieldSchema::string().describe("Name of the new workspace"),
        ),
        move |args| async move {
            let name = Arguments::new(args).string("workspaceName")?;
            respond(&api.post("workspaces", &json!({ "name": name })).await?)
        },
    ));
}
