//! Folder tools

use std::sync::Arc;

use serde_json::json;

use super::{Arguments, FieldSchema, Registrar, ToolDescriptor, ToolSchema, respond};
use crate::smartsheet::SmartsheetClient;

pub(super) fn register(registrar: &mut dyn Registrar, client: &Arc<SmartsheetClient>) {
    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "get_folder",
        "Gets a folder and the sheets, reports and sub-folders it contains",
        ToolSchema::new().field("folderId", FieldSchema::id().describe("The ID of the folder")),
        move |args| async move {
            let folder_id = Arguments::new(args).id("folderId")?;
            respond(&api.get(&format!("folders/{folder_id}"), &[]).await?)
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "create_folder",
        "Creates a sub-folder inside an existing folder",
        ToolSchema::new()
            .field("folderId", FieldSchema::id().describe("The ID of the parent folder"))
            .field("folderName", FieldSchema::string().describe("Name of the new folder")),
        move |args| async move {
            let args = Arguments::new(args);
            let parent = args.id("folderId")?;
            let body = json!({ "name": args.string("folderName")? });
            respond(&api.post(&format!("folders/{parent}/folders"), &body).await?)
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "create_workspace_folder",
        "Creates a folder at the top level of a workspace",
        ToolSchema::new()
            .field(
                "workspaceId",
                FieldSchema::id().describe("The ID of the workspace"),
            )
            .field("folderName", FieldSchema::string().describe("Name of the new folder")),
        move |args| async move {
            let args = Arguments::new(args);
            let workspace = args.id("workspaceId")?;
            let body = json!({ "name": args.string("folderName")? });
            respond(
                &api.post(&format!("workspaces/{workspace}/folders"), &body)
                    .await?,
            )
        },
    ));
}
