//! User tools

use std::sync::Arc;

use super::{
    Arguments, FieldSchema, Query, Registrar, ToolDescriptor, ToolSchema, optional_query,
    paging, respond,
};
use crate::smartsheet::SmartsheetClient;

pub(super) fn register(registrar: &mut dyn Registrar, client: &Arc<SmartsheetClient>) {
    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "get_current_user",
        "Gets the profile of the user the API key belongs to",
        ToolSchema::new(),
        move |_args| async move { respond(&api.get("users/me", &[]).await?) },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "get_user",
        "Gets a user's profile by id",
        ToolSchema::new().field("userId", FieldSchema::id().describe("The ID of the user")),
        move |args| async move {
            let user_id = Arguments::new(args).id("userId")?;
            respond(&api.get(&format!("users/{user_id}"), &[]).await?)
        },
    ));

    let api = Arc::clone(client);
    registrar.register(ToolDescriptor::new(
        "list_users",
        "Lists users in the organization, optionally filtered by email",
        ToolSchema::new()
            .field(
                "email",
                FieldSchema::string()
                    .optional()
                    .describe("Comma-separated email addresses to filter by"),
            )
            .paged("Number of users per page", "Which page to return"),
        move |args| async move {
            let args = Arguments::new(args);
            let mut query = Query::new();
            optional_query(&args, "email", &mut query)?;
            paging(&args, &mut query)?;
            respond(&api.get("users", &query).await?)
        },
    ));
}
