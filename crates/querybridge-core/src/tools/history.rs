use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use time::format_description::well_known::Rfc3339;

use crate::{
    markdown,
    state::{AppContext, ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, simple_text, text_response, wrap_handler},
};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

#[derive(Debug, Deserialize, Default)]
struct Args {
    limit: Option<usize>,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "query_history".to_string(),
            description: "Recent dispatched queries, newest first.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "number",
                        "description": "Maximum entries to return (default 50)"
                    }
                }
            }),
        },
        wrap_handler(|context, value| async move {
            let args: Args = parse_args(value)?;
            handle(context, args).await
        }),
    )
}

async fn handle(context: Arc<AppContext>, args: Args) -> Result<ToolResponse> {
    let limit = args.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let records = context.store.recent_history(limit).await?;

    if records.is_empty() {
        return Ok(simple_text("No queries recorded yet."));
    }

    let mut lines = vec![markdown::header(1, "Query history"), String::new()];
    for record in &records {
        lines.push(format!(
            "• [{}] {} — `{}` → {} ({})",
            record.id, record.status, record.user_query, record.endpoint_url, record.connection_id
        ));
    }

    let metadata = json!({
        "entries": records
            .iter()
            .map(|record| {
                json!({
                    "id": record.id,
                    "connectionId": record.connection_id,
                    "userQuery": record.user_query,
                    "endpointUrl": record.endpoint_url,
                    "status": record.status,
                    "createdAt": record.created_at.format(&Rfc3339).unwrap_or_default(),
                })
            })
            .collect::<Vec<_>>(),
    });
    Ok(text_response(lines).with_metadata(metadata))
}
