use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use querybridge_client::types::{AuthScheme, Connection, NewConnection};
use serde::Deserialize;
use serde_json::json;
use time::format_description::well_known::Rfc3339;

use crate::{
    markdown,
    state::{AppContext, ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, simple_text, text_response, wrap_handler},
};

pub fn list_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "list_connections".to_string(),
            description: "List active registered API connections.".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        },
        wrap_handler(|context, _value| async move { handle_list(context).await }),
    )
}

pub fn register_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "register_connection".to_string(),
            description: "Register a third-party API endpoint so queries can be dispatched \
                          against it."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "required": ["name", "baseUrl", "authType"],
                "properties": {
                    "name": {"type": "string"},
                    "baseUrl": {"type": "string"},
                    "authType": {
                        "type": "string",
                        "enum": ["api_key", "bearer", "basic", "oauth", "none"]
                    },
                    "authData": {"type": "object"},
                    "headers": {"type": "object"}
                }
            }),
        },
        wrap_handler(|context, value| async move {
            let args: RegisterArgs = parse_args(value)?;
            handle_register(context, args).await
        }),
    )
}

pub fn remove_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "remove_connection".to_string(),
            description: "Deactivate a registered connection. The record is kept for history."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "required": ["connectionId"],
                "properties": {
                    "connectionId": {"type": "number"}
                }
            }),
        },
        wrap_handler(|context, value| async move {
            let args: RemoveArgs = parse_args(value)?;
            handle_remove(context, args).await
        }),
    )
}

#[derive(Debug, Deserialize)]
struct RegisterArgs {
    name: String,
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "authType")]
    auth_type: AuthScheme,
    #[serde(rename = "authData", default)]
    auth_data: HashMap<String, String>,
    #[serde(default)]
    headers: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RemoveArgs {
    #[serde(rename = "connectionId")]
    connection_id: i64,
}

async fn handle_list(context: Arc<AppContext>) -> Result<ToolResponse> {
    let connections = context.store.list_connections().await?;
    if connections.is_empty() {
        return Ok(simple_text(
            "No connections registered yet.\nUse `register_connection` to add one.",
        ));
    }

    let mut lines = vec![
        markdown::header(1, "Registered connections"),
        String::new(),
    ];
    for connection in &connections {
        lines.push(format!(
            "• [{}] {} — {} ({})",
            connection.id, connection.name, connection.base_url, connection.auth_type
        ));
    }

    let metadata = json!({
        "connections": connections.iter().map(summary_json).collect::<Vec<_>>(),
    });
    Ok(text_response(lines).with_metadata(metadata))
}

async fn handle_register(context: Arc<AppContext>, args: RegisterArgs) -> Result<ToolResponse> {
    if args.name.trim().is_empty() {
        bail!("missing required field: name");
    }
    if args.base_url.trim().is_empty() {
        bail!("missing required field: baseUrl");
    }

    let id = context
        .store
        .create_connection(NewConnection {
            name: args.name.clone(),
            base_url: args.base_url,
            auth_type: args.auth_type,
            auth_data: args.auth_data,
            headers: args.headers,
        })
        .await?;

    Ok(
        simple_text(format!("Connection `{}` registered with id {id}.", args.name))
            .with_metadata(json!({"id": id, "name": args.name})),
    )
}

async fn handle_remove(context: Arc<AppContext>, args: RemoveArgs) -> Result<ToolResponse> {
    context
        .store
        .deactivate_connection(args.connection_id)
        .await?;
    Ok(
        simple_text(format!("Connection {} deactivated.", args.connection_id))
            .with_metadata(json!({"id": args.connection_id})),
    )
}

/// Listing shape: credentials never leave the store.
fn summary_json(connection: &Connection) -> serde_json::Value {
    json!({
        "id": connection.id,
        "name": connection.name,
        "baseUrl": connection.base_url,
        "authType": connection.auth_type,
        "createdAt": connection
            .created_at
            .format(&Rfc3339)
            .unwrap_or_default(),
    })
}
