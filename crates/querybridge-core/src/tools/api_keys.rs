use std::sync::Arc;

use anyhow::{bail, Result};
use querybridge_client::types::{ApiKeyUpdate, NewApiKey};
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
            name: "list_api_keys".to_string(),
            description: "List stored API keys (values are never returned).".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        },
        wrap_handler(|context, _value| async move { handle_list(context).await }),
    )
}

pub fn create_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "create_api_key".to_string(),
            description: "Store an API key for a named service.".to_string(),
            input_schema: json!({
                "type": "object",
                "required": ["name", "service", "keyValue"],
                "properties": {
                    "name": {"type": "string"},
                    "service": {"type": "string"},
                    "keyValue": {"type": "string"}
                }
            }),
        },
        wrap_handler(|context, value| async move {
            let args: CreateArgs = parse_args(value)?;
            handle_create(context, args).await
        }),
    )
}

pub fn update_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "update_api_key".to_string(),
            description: "Update fields of a stored API key; absent fields are unchanged."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "required": ["keyId"],
                "properties": {
                    "keyId": {"type": "number"},
                    "name": {"type": "string"},
                    "service": {"type": "string"},
                    "keyValue": {"type": "string"},
                    "status": {"type": "string"}
                }
            }),
        },
        wrap_handler(|context, value| async move {
            let args: UpdateArgs = parse_args(value)?;
            handle_update(context, args).await
        }),
    )
}

pub fn delete_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "delete_api_key".to_string(),
            description: "Deactivate a stored API key.".to_string(),
            input_schema: json!({
                "type": "object",
                "required": ["keyId"],
                "properties": {
                    "keyId": {"type": "number"}
                }
            }),
        },
        wrap_handler(|context, value| async move {
            let args: KeyIdArgs = parse_args(value)?;
            handle_delete(context, args).await
        }),
    )
}

pub fn test_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "test_api_key".to_string(),
            description: "Check a stored key against its service's probe endpoint and update \
                          its status. Supported services: openai, github, stripe."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "required": ["keyId"],
                "properties": {
                    "keyId": {"type": "number"}
                }
            }),
        },
        wrap_handler(|context, value| async move {
            let args: KeyIdArgs = parse_args(value)?;
            handle_test(context, args).await
        }),
    )
}

#[derive(Debug, Deserialize)]
struct CreateArgs {
    name: String,
    service: String,
    #[serde(rename = "keyValue")]
    key_value: String,
}

#[derive(Debug, Deserialize)]
struct UpdateArgs {
    #[serde(rename = "keyId")]
    key_id: i64,
    name: Option<String>,
    service: Option<String>,
    #[serde(rename = "keyValue")]
    key_value: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeyIdArgs {
    #[serde(rename = "keyId")]
    key_id: i64,
}

async fn handle_list(context: Arc<AppContext>) -> Result<ToolResponse> {
    let keys = context.store.list_api_keys().await?;
    if keys.is_empty() {
        return Ok(simple_text("No API keys stored."));
    }

    let mut lines = vec![markdown::header(1, "Stored API keys"), String::new()];
    for key in &keys {
        lines.push(format!(
            "• [{}] {} — {} ({})",
            key.id, key.name, key.service, key.status
        ));
    }

    let metadata = json!({
        "keys": keys
            .iter()
            .map(|key| {
                json!({
                    "id": key.id,
                    "name": key.name,
                    "service": key.service,
                    "status": key.status,
                    "lastUsed": key
                        .last_used
                        .and_then(|stamp| stamp.format(&Rfc3339).ok()),
                    "createdAt": key.created_at.format(&Rfc3339).unwrap_or_default(),
                })
            })
            .collect::<Vec<_>>(),
    });
    Ok(text_response(lines).with_metadata(metadata))
}

async fn handle_create(context: Arc<AppContext>, args: CreateArgs) -> Result<ToolResponse> {
    if args.name.trim().is_empty() {
        bail!("missing required field: name");
    }
    if args.service.trim().is_empty() {
        bail!("missing required field: service");
    }
    if args.key_value.trim().is_empty() {
        bail!("missing required field: keyValue");
    }

    let id = context
        .store
        .create_api_key(NewApiKey {
            name: args.name,
            service: args.service,
            key_value: args.key_value,
        })
        .await?;
    Ok(simple_text(format!("API key stored with id {id}."))
        .with_metadata(json!({"id": id})))
}

async fn handle_update(context: Arc<AppContext>, args: UpdateArgs) -> Result<ToolResponse> {
    context
        .store
        .update_api_key(
            args.key_id,
            ApiKeyUpdate {
                name: args.name,
                service: args.service,
                key_value: args.key_value,
                status: args.status,
            },
        )
        .await?;
    Ok(simple_text(format!("API key {} updated.", args.key_id)))
}

async fn handle_delete(context: Arc<AppContext>, args: KeyIdArgs) -> Result<ToolResponse> {
    context.store.deactivate_api_key(args.key_id).await?;
    Ok(simple_text(format!("API key {} deleted.", args.key_id)))
}

/// Probe endpoints for the services whose keys can be checked directly.
fn service_probe(service: &str, key_value: &str) -> Option<(&'static str, Vec<(String, String)>)> {
    match service.to_lowercase().as_str() {
        "openai" => Some((
            "https://api.openai.com/v1/models",
            vec![("Authorization".to_string(), format!("Bearer {key_value}"))],
        )),
        "github" => Some((
            "https://api.github.com/user",
            vec![("Authorization".to_string(), format!("token {key_value}"))],
        )),
        "stripe" => Some((
            "https://api.stripe.com/v1/charges",
            vec![("Authorization".to_string(), format!("Bearer {key_value}"))],
        )),
        _ => None,
    }
}

async fn handle_test(context: Arc<AppContext>, args: KeyIdArgs) -> Result<ToolResponse> {
    let key = context.store.get_api_key(args.key_id).await?;
    let Some((url, headers)) = service_probe(&key.service, &key.key_value) else {
        bail!("API key testing not implemented for service `{}`", key.service);
    };

    match context.client.check_endpoint(url, &headers).await {
        Ok((200, _)) => {
            context.store.touch_api_key(key.id, "Active").await?;
            Ok(
                simple_text(format!("{} API key is working correctly.", key.service))
                    .with_metadata(json!({"success": true, "status": 200})),
            )
        }
        Ok((status, _)) => {
            context.store.touch_api_key(key.id, "Invalid").await?;
            Ok(simple_text(format!(
                "API key test failed with status {status}."
            ))
            .with_metadata(json!({"success": false, "status": status})))
        }
        Err(error) => {
            context.store.touch_api_key(key.id, "Error").await?;
            Ok(simple_text(format!("API key test failed: {error}"))
                .with_metadata(json!({"success": false, "error": error.to_string()})))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_endpoints_cover_supported_services() {
        for service in ["openai", "GitHub", "STRIPE"] {
            assert!(service_probe(service, "k").is_some(), "{service} missing");
        }
        assert!(service_probe("unsupported", "k").is_none());
    }

    #[test]
    fn github_keys_use_token_scheme() {
        let (_, headers) = service_probe("github", "abc").expect("github probe");
        assert_eq!(headers[0].1, "token abc");
    }
}
