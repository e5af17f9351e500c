use std::sync::Arc;

use anyhow::Result;
use querybridge_client::types::SettingsMap;
use serde_json::json;

use crate::{
    state::{AppContext, ToolDefinition, ToolHandler, ToolResponse},
    tools::{parse_args, simple_text, wrap_handler},
};

pub fn get_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "get_settings".to_string(),
            description: "Current user settings, organized by category. Defaults are served \
                          when nothing has been saved."
                .to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        },
        wrap_handler(|context, _value| async move { handle_get(context).await }),
    )
}

pub fn save_definition() -> (ToolDefinition, ToolHandler) {
    (
        ToolDefinition {
            name: "save_settings".to_string(),
            description: "Replace the stored settings document with the provided \
                          category -> key -> value mapping."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "additionalProperties": {"type": "object"}
            }),
        },
        wrap_handler(|context, value| async move {
            let settings: SettingsMap = parse_args(value)?;
            handle_save(context, settings).await
        }),
    )
}

async fn handle_get(context: Arc<AppContext>) -> Result<ToolResponse> {
    let mut settings = context.store.get_settings().await?;
    if settings.is_empty() {
        settings = default_settings();
    }
    Ok(simple_text("Current settings attached as metadata.")
        .with_metadata(serde_json::to_value(settings)?))
}

async fn handle_save(context: Arc<AppContext>, settings: SettingsMap) -> Result<ToolResponse> {
    context.store.replace_settings(settings).await?;
    Ok(simple_text("Settings saved."))
}

fn default_settings() -> SettingsMap {
    let document = json!({
        "notifications": {
            "email": true,
            "push": false,
            "queryAlerts": true,
            "connectionStatus": true,
        },
        "appearance": {
            "darkMode": false,
            "compactMode": false,
            "language": "en",
        },
        "privacy": {
            "analytics": true,
            "crashReports": true,
            "shareUsage": false,
        },
        "api": {
            "timeout": 30,
            "retries": 3,
            "caching": true,
        }
    });
    serde_json::from_value(document).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_cover_all_categories() {
        let defaults = default_settings();
        for category in ["notifications", "appearance", "privacy", "api"] {
            assert!(defaults.contains_key(category), "missing {category}");
        }
    }
}
