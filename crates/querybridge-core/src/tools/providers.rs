use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Deserialize;
use serde_json::json;

use crate::{
    markdown,
    registry::ProviderDescriptor,
    state::{AppContext, ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, simple_text, text_response, wrap_handler},
};

pub fn list_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "list_providers".to_string(),
            description: "List all catalogued API providers with their base URLs and auth \
                          schemes."
                .to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        },
        wrap_handler(|context, _value| async move { handle_list(context).await }),
    )
}

pub fn search_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "search_providers".to_string(),
            description: "Substring search over provider keys, names, and descriptions."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "required": ["query"],
                "properties": {
                    "query": {"type": "string"}
                }
            }),
        },
        wrap_handler(|context, value| async move {
            let args: SearchArgs = parse_args(value)?;
            handle_search(context, args).await
        }),
    )
}

pub fn categories_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "provider_categories".to_string(),
            description: "Catalogued providers grouped by category.".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        },
        wrap_handler(|context, _value| async move { handle_categories(context).await }),
    )
}

pub fn details_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "provider_details".to_string(),
            description: "Full descriptor for one provider: endpoints, query keywords, and \
                          example queries."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "required": ["key"],
                "properties": {
                    "key": {"type": "string"}
                }
            }),
        },
        wrap_handler(|context, value| async move {
            let args: DetailsArgs = parse_args(value)?;
            handle_details(context, args).await
        }),
    )
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

#[derive(Debug, Deserialize)]
struct DetailsArgs {
    key: String,
}

async fn handle_list(context: Arc<AppContext>) -> Result<ToolResponse> {
    let mut lines = vec![
        markdown::header(1, "API providers"),
        String::new(),
    ];
    for descriptor in context.registry.iter() {
        lines.push(format!(
            "• `{}` — {} ({})",
            descriptor.key, descriptor.name, descriptor.auth_type
        ));
    }

    let metadata = json!({
        "providers": context
            .registry
            .iter()
            .map(overview_json)
            .collect::<Vec<_>>(),
    });
    Ok(text_response(lines).with_metadata(metadata))
}

async fn handle_search(context: Arc<AppContext>, args: SearchArgs) -> Result<ToolResponse> {
    if args.query.trim().is_empty() {
        return Ok(simple_text("Empty query; nothing to search.")
            .with_metadata(json!({"results": []})));
    }

    let results = context.registry.search(&args.query);
    if results.is_empty() {
        return Ok(
            simple_text(format!("No providers matched `{}`.", args.query))
                .with_metadata(json!({"results": []})),
        );
    }

    let mut lines = vec![
        markdown::header(1, "Matching providers"),
        String::new(),
    ];
    for summary in &results {
        lines.push(format!(
            "• `{}` — {}: {}",
            summary.key, summary.name, summary.description
        ));
    }
    Ok(text_response(lines).with_metadata(json!({"results": results})))
}

async fn handle_categories(context: Arc<AppContext>) -> Result<ToolResponse> {
    let mut lines = vec![markdown::header(1, "Provider categories"), String::new()];
    let mut groups = serde_json::Map::new();

    for (label, keys) in context.registry.categories() {
        lines.push(markdown::header(2, label));
        let mut members = Vec::new();
        for key in *keys {
            if let Some(descriptor) = context.registry.lookup_by_key(key) {
                lines.push(format!("• `{}` — {}", descriptor.key, descriptor.name));
                members.push(overview_json(descriptor));
            }
        }
        lines.push(String::new());
        groups.insert((*label).to_string(), json!(members));
    }

    Ok(text_response(lines).with_metadata(json!({"categories": groups})))
}

async fn handle_details(context: Arc<AppContext>, args: DetailsArgs) -> Result<ToolResponse> {
    let Some(descriptor) = context.registry.lookup_by_key(&args.key) else {
        bail!("provider not found: {}", args.key);
    };

    let mut lines = vec![
        markdown::header(1, descriptor.name),
        String::new(),
        markdown::bold("Key", descriptor.key),
        markdown::bold("Base URL", descriptor.base_url),
        markdown::bold("Auth", descriptor.auth_type.as_str()),
        markdown::bold("About", descriptor.description),
    ];
    if !descriptor.endpoints.is_empty() {
        lines.push(String::new());
        lines.push(markdown::header(2, "Known endpoints"));
        for (name, path) in descriptor.endpoints {
            lines.push(format!("• `{name}` → `{path}`"));
        }
    }
    if !descriptor.example_queries.is_empty() {
        lines.push(String::new());
        lines.push(markdown::header(2, "Example queries"));
        for example in descriptor.example_queries {
            lines.push(format!("• {example}"));
        }
    }

    Ok(text_response(lines).with_metadata(descriptor.detail_json()))
}

fn overview_json(descriptor: &ProviderDescriptor) -> serde_json::Value {
    json!({
        "key": descriptor.key,
        "name": descriptor.name,
        "baseUrl": descriptor.base_url,
        "authType": descriptor.auth_type,
        "description": descriptor.description,
        "exampleQueries": descriptor.example_queries,
    })
}
