use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::state::{AppContext, ToolContent, ToolEntry, ToolHandler, ToolResponse};

mod api_keys;
mod connections;
mod history;
mod providers;
mod query;
mod settings;
mod test_connection;

pub async fn register_tools(context: Arc<AppContext>) {
    let tools = [
        query::definition(),
        test_connection::definition(),
        connections::list_definition(),
        connections::register_definition(),
        connections::remove_definition(),
        providers::list_definition(),
        providers::search_definition(),
        providers::categories_definition(),
        providers::details_definition(),
        history::definition(),
        settings::get_definition(),
        settings::save_definition(),
        api_keys::list_definition(),
        api_keys::create_definition(),
        api_keys::update_definition(),
        api_keys::delete_definition(),
        api_keys::test_definition(),
    ];

    let registry = context.tools.clone();
    for (definition, handler) in tools {
        registry
            .insert(ToolEntry {
                definition,
                handler,
            })
            .await;
    }
}

pub(crate) fn text_response(lines: impl IntoIterator<Item = String>) -> ToolResponse {
    ToolResponse {
        content: vec![ToolContent {
            r#type: "text".to_string(),
            text: lines.into_iter().collect::<Vec<_>>().join("\n"),
        }],
        metadata: None,
    }
}

pub(crate) fn simple_text(text: impl Into<String>) -> ToolResponse {
    ToolResponse {
        content: vec![ToolContent {
            r#type: "text".to_string(),
            text: text.into(),
        }],
        metadata: None,
    }
}

pub(crate) fn wrap_handler<F, Fut>(handler: F) -> ToolHandler
where
    F: Fn(Arc<AppContext>, serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<ToolResponse>> + Send + 'static,
{
    Arc::new(move |context, value| {
        let ctx = context.clone();
        let fut = handler(ctx, value);
        Box::pin(fut)
    })
}

pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|error| anyhow!("invalid arguments: {error}"))
}

pub use connections::{
    list_definition as list_connections_definition,
    register_definition as register_connection_definition,
    remove_definition as remove_connection_definition,
};
pub use history::definition as query_history_definition;
pub use providers::{
    categories_definition as provider_categories_definition,
    details_definition as provider_details_definition,
    list_definition as list_providers_definition,
    search_definition as search_providers_definition,
};
pub use query::definition as query_definition;
pub use settings::{
    get_definition as get_settings_definition, save_definition as save_settings_definition,
};
pub use test_connection::definition as test_connection_definition;
