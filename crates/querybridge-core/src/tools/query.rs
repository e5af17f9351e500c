use std::sync::Arc;

use anyhow::{bail, Result};
use querybridge_client::types::{NewHistoryRecord, QueryStatus};
use querybridge_client::DispatchClient;
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;

use crate::{
    markdown,
    state::{AppContext, QueryLog, ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, text_response, wrap_handler},
};

/// How much of a response body is echoed into the markdown summary.
const BODY_PREVIEW: usize = 1200;

#[derive(Debug, Deserialize)]
struct Args {
    query: String,
    #[serde(rename = "connectionId")]
    connection_id: i64,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "query".to_string(),
            description: "Translate a natural-language query into an HTTP request against a \
                          registered connection, execute it, and record the outcome in the \
                          query history. Examples: 'list 5 repos', 'weather for london'."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "required": ["query", "connectionId"],
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Free-text request, e.g. 'show me the blog articles'"
                    },
                    "connectionId": {
                        "type": "number",
                        "description": "Id of a registered connection"
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
    if args.query.trim().is_empty() {
        bail!("query must not be empty");
    }

    let connection = context.store.get_connection(args.connection_id).await?;
    let interpretation = context.interpreter.interpret(&args.query, &connection);
    let url = DispatchClient::resolve_url(&connection.base_url, &interpretation.endpoint);

    match context.client.dispatch(&connection, &interpretation).await {
        Ok((status, body)) => {
            let record_id = context
                .store
                .append_history(NewHistoryRecord {
                    connection_id: connection.id,
                    user_query: args.query.clone(),
                    interpretation: serde_json::to_value(&interpretation)?,
                    endpoint_url: url.clone(),
                    response_body: serde_json::to_string(&body)?,
                    status: QueryStatus::Success,
                })
                .await?;
            context
                .record_query(QueryLog {
                    connection_id: connection.id,
                    query: args.query.clone(),
                    endpoint: interpretation.endpoint.clone(),
                    method: interpretation.method.to_string(),
                    status: QueryStatus::Success,
                    timestamp: OffsetDateTime::now_utc(),
                })
                .await;

            let pretty = serde_json::to_string_pretty(&body)?;
            let lines = vec![
                markdown::header(1, "Query executed"),
                String::new(),
                markdown::bold("Connection", &connection.name),
                markdown::bold("URL", &url),
                markdown::bold("Method", interpretation.method.as_str()),
                markdown::bold("Status", &status.to_string()),
                String::new(),
                markdown::code_block("json", &preview(&pretty)),
            ];
            Ok(text_response(lines).with_metadata(json!({
                "success": true,
                "queryId": record_id,
                "status": status,
                "interpretation": interpretation,
                "data": body,
            })))
        }
        Err(error) => {
            let message = error.to_string();
            let record_id = context
                .store
                .append_history(NewHistoryRecord {
                    connection_id: connection.id,
                    user_query: args.query.clone(),
                    interpretation: serde_json::to_value(&interpretation)?,
                    endpoint_url: url.clone(),
                    response_body: message.clone(),
                    status: QueryStatus::Error,
                })
                .await?;
            context
                .record_query(QueryLog {
                    connection_id: connection.id,
                    query: args.query.clone(),
                    endpoint: interpretation.endpoint.clone(),
                    method: interpretation.method.to_string(),
                    status: QueryStatus::Error,
                    timestamp: OffsetDateTime::now_utc(),
                })
                .await;

            let lines = vec![
                markdown::header(1, "Query failed"),
                String::new(),
                markdown::bold("Connection", &connection.name),
                markdown::bold("URL", &url),
                markdown::bold("Method", interpretation.method.as_str()),
                markdown::bold("Error", &message),
            ];
            Ok(text_response(lines).with_metadata(json!({
                "success": false,
                "queryId": record_id,
                "error": message,
                "interpretation": interpretation,
            })))
        }
    }
}

fn preview(body: &str) -> String {
    if body.len() <= BODY_PREVIEW {
        body.to_string()
    } else {
        let mut cut = BODY_PREVIEW;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…", &body[..cut])
    }
}
