use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::executor::{ToolExecutor, ToolExecutorError};

const SERVER_INSTRUCTIONS: &str = r#"You are connected to QueryBridge, a natural-language gateway to registered third-party HTTP APIs.

## Typical flow

1. `list_providers` / `search_providers` to browse the catalog of known APIs.
2. `register_connection { "name": "...", "baseUrl": "...", "authType": "bearer", "authData": {"token": "..."} }` to register an endpoint.
3. `test_connection` with the same fields to verify reachability and credentials before relying on it.
4. `query { "query": "list 5 repos", "connectionId": 1 }` to translate free text into a live HTTP call.
5. `query_history` to review what was dispatched.

## How queries are interpreted

- The connection's base URL is matched against the provider catalog.
- Catalogued providers score their known endpoints by keyword overlap; the best match wins.
- Dates, quoted phrases, locations, and bare numbers in the query become request parameters.
- Unknown APIs fall back to REST verb/noun heuristics (GET/POST/PUT/DELETE, /users, /posts, ...).

Results and failures are both recorded in the query history."#;

pub async fn serve_stdio(executor: ToolExecutor) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = BufReader::new(stdin);
    let mut writer = stdout;

    let mut buffer = String::new();
    loop {
        buffer.clear();
        let bytes = reader.read_line(&mut buffer).await?;
        if bytes == 0 {
            info!(target: "querybridge_transport", "STDIO closed; shutting down");
            break;
        }

        debug!(target: "querybridge_transport", request = buffer.trim());
        let maybe_response = match serde_json::from_str::<RpcRequest>(&buffer) {
            Ok(request) => handle_request(&executor, request).await,
            Err(error) => {
                warn!(target: "querybridge_transport", error = %error, "Failed to parse request");
                Some(RpcResponse::error(None, -32700, "Parse error"))
            }
        };

        if let Some(response) = maybe_response {
            let payload = serde_json::to_string(&response)?;
            writer.write_all(payload.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct RpcRequest {
    pub id: Option<serde_json::Value>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i32,
    message: String,
}

impl RpcResponse {
    fn result(id: Option<serde_json::Value>, value: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(value),
            error: None,
        }
    }

    fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

async fn handle_request(executor: &ToolExecutor, request: RpcRequest) -> Option<RpcResponse> {
    let method = request.method.as_str();

    if request.id.is_none() {
        match method {
            "notifications/initialized" => {
                info!(target: "querybridge_transport", "Client signaled initialized");
            }
            other => {
                debug!(
                    target: "querybridge_transport",
                    method = other,
                    "Ignoring notification without handler"
                );
            }
        }
        return None;
    }

    let id_value = request.id.clone()?;

    match method {
        "initialize" => Some(RpcResponse::result(
            Some(id_value),
            json!({
                "protocolVersion": "2024-11-05",
                "serverInfo": {
                    "name": "querybridge",
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "capabilities": {
                    "tools": {}
                },
                "instructions": SERVER_INSTRUCTIONS,
            }),
        )),
        "list_tools" | "tools/list" => {
            let definitions = executor.list_tools().await;
            Some(RpcResponse::result(
                Some(id_value),
                json!({"tools": definitions}),
            ))
        }
        "call_tool" | "tools/call" => {
            let params = request.params.unwrap_or_else(|| json!({}));
            let name_value = params.get("name").cloned();
            let arguments = params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));

            let Some(name_value) = name_value else {
                return Some(RpcResponse::error(Some(id_value), -32602, "Missing tool name"));
            };
            let Some(name) = name_value.as_str() else {
                return Some(RpcResponse::error(
                    Some(id_value),
                    -32602,
                    "Tool name must be a string",
                ));
            };

            match executor.call_tool(name, arguments).await {
                Ok(response) => match serde_json::to_value(response) {
                    Ok(value) => Some(RpcResponse::result(Some(id_value), value)),
                    Err(error) => Some(RpcResponse::error(
                        Some(id_value),
                        -32603,
                        format!("Internal error: failed to serialize response: {error}"),
                    )),
                },
                Err(ToolExecutorError::UnknownTool(name)) => Some(RpcResponse::error(
                    Some(id_value),
                    -32601,
                    format!("Unknown tool: {name}"),
                )),
                Err(ToolExecutorError::Execution { source, .. }) => Some(RpcResponse::error(
                    Some(id_value),
                    -32000,
                    source.to_string(),
                )),
            }
        }
        _ => Some(RpcResponse::error(
            Some(id_value),
            -32601,
            format!("Unknown method: {}", method),
        )),
    }
}
