use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use querybridge_client::types::{AuthScheme, ProbeOutcome};
use querybridge_client::DispatchClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    markdown,
    state::{AppContext, ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, text_response, wrap_handler},
};

#[derive(Debug, Deserialize)]
struct Args {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "authType")]
    auth_type: AuthScheme,
    #[serde(rename = "authData", default)]
    auth_data: HashMap<String, String>,
    #[serde(default)]
    headers: HashMap<String, String>,
}

pub fn definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "test_connection".to_string(),
            description: "Probe a base URL before registering it: tries a short list of \
                          candidate endpoints (provider-specific when the URL is recognized) \
                          and reports reachability, credential, or permission problems."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "required": ["baseUrl", "authType"],
                "properties": {
                    "baseUrl": {"type": "string"},
                    "authType": {
                        "type": "string",
                        "enum": ["api_key", "bearer", "basic", "oauth", "none"]
                    },
                    "authData": {
                        "type": "object",
                        "description": "Credential blob, e.g. {\"token\": \"...\"}"
                    },
                    "headers": {"type": "object"}
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
    if args.base_url.trim().is_empty() {
        bail!("baseUrl must not be empty");
    }

    let provider = context.registry.detect_by_url(&args.base_url);
    let candidates = DispatchClient::probe_candidates(provider.map(|descriptor| descriptor.key));

    let outcome = context
        .client
        .probe(
            &args.base_url,
            &args.auth_type,
            &args.auth_data,
            &args.headers,
            candidates,
        )
        .await;

    let mut lines = vec![markdown::header(1, "Connection test"), String::new()];
    if let Some(descriptor) = provider {
        lines.push(markdown::bold("Detected provider", descriptor.name));
    }
    match &outcome {
        ProbeOutcome::Reachable {
            endpoint,
            status,
            body_bytes,
        } => {
            lines.push(markdown::bold("Result", "reachable"));
            lines.push(markdown::bold("Endpoint", endpoint));
            lines.push(markdown::bold("Status", &status.to_string()));
            lines.push(markdown::bold("Response size", &body_bytes.to_string()));
        }
        ProbeOutcome::AuthRejected { endpoint } => {
            lines.push(markdown::bold("Result", "authentication failed"));
            lines.push(markdown::bold("Endpoint", endpoint));
            lines.push("Check the API credentials before saving this connection.".to_string());
        }
        ProbeOutcome::PermissionDenied { endpoint } => {
            lines.push(markdown::bold("Result", "access forbidden"));
            lines.push(markdown::bold("Endpoint", endpoint));
            lines.push("Check API permissions and rate limits.".to_string());
        }
        ProbeOutcome::Unreachable {
            attempted,
            last_error,
        } => {
            lines.push(markdown::bold("Result", "unreachable"));
            lines.push(markdown::bold("Tried", &attempted.join(", ")));
            if let Some(error) = last_error {
                lines.push(markdown::bold("Last error", error));
            }
            lines.push("Verify the base URL and authentication credentials.".to_string());
        }
    }

    let metadata = json!({
        "success": outcome.succeeded(),
        "provider": provider.map(|descriptor| descriptor.key),
        "outcome": outcome,
    });
    Ok(text_response(lines).with_metadata(metadata))
}
