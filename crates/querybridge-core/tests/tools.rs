use std::sync::Arc;

use querybridge_client::store::{JsonStore, Store};
use querybridge_client::types::{NewHistoryRecord, QueryStatus};
use querybridge_client::DispatchClient;
use querybridge_core::state::AppContext;
use querybridge_core::tools::{
    get_settings_definition, list_connections_definition, provider_details_definition,
    query_definition, query_history_definition, register_connection_definition,
    remove_connection_definition, save_settings_definition, search_providers_definition,
};
use serde_json::json;
use tempfile::{tempdir, TempDir};

async fn test_context() -> (TempDir, Arc<AppContext>) {
    let dir = tempdir().expect("tempdir");
    let store = JsonStore::open(dir.path()).await.expect("store opens");
    let context = Arc::new(AppContext::new(DispatchClient::new(), Arc::new(store)));
    (dir, context)
}

#[tokio::test]
async fn register_then_list_connections() {
    let (_dir, context) = test_context().await;

    let (_definition, register) = register_connection_definition();
    let response = register(
        context.clone(),
        json!({
            "name": "GitHub",
            "baseUrl": "https://api.github.com",
            "authType": "bearer",
            "authData": {"token": "abc"}
        }),
    )
    .await
    .expect("register succeeds");
    let metadata = response.metadata.expect("metadata present");
    assert_eq!(metadata["id"], 1);

    let (_definition, list) = list_connections_definition();
    let response = list(context.clone(), json!({})).await.expect("list succeeds");
    assert!(response.content[0].text.contains("GitHub"));

    let listed = &response.metadata.expect("metadata")["connections"];
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    // Credentials never appear in the listing shape.
    assert!(listed[0].get("authData").is_none());
}

#[tokio::test]
async fn register_rejects_missing_fields() {
    let (_dir, context) = test_context().await;

    let (_definition, register) = register_connection_definition();
    let error = register(context.clone(), json!({"name": "incomplete"}))
        .await
        .expect_err("missing baseUrl should fail");
    assert!(error.to_string().contains("invalid arguments"));

    let error = register(
        context,
        json!({"name": "  ", "baseUrl": "https://x.example", "authType": "none"}),
    )
    .await
    .expect_err("blank name should fail");
    assert!(error.to_string().contains("name"));
}

#[tokio::test]
async fn removed_connections_disappear_from_listing() {
    let (_dir, context) = test_context().await;

    let (_definition, register) = register_connection_definition();
    register(
        context.clone(),
        json!({"name": "Temp", "baseUrl": "https://x.example", "authType": "none"}),
    )
    .await
    .expect("register succeeds");

    let (_definition, remove) = remove_connection_definition();
    remove(context.clone(), json!({"connectionId": 1}))
        .await
        .expect("remove succeeds");

    let (_definition, list) = list_connections_definition();
    let response = list(context.clone(), json!({})).await.expect("list succeeds");
    assert!(response.content[0].text.contains("No connections"));

    let error = remove(context, json!({"connectionId": 99}))
        .await
        .expect_err("unknown id should fail");
    assert!(error.to_string().contains("not found"));
}

#[tokio::test]
async fn query_tool_requires_a_known_connection() {
    let (_dir, context) = test_context().await;

    let (_definition, query) = query_definition();
    let error = query(
        context,
        json!({"query": "list 5 repos", "connectionId": 7}),
    )
    .await
    .expect_err("unknown connection should fail");
    assert!(error.to_string().contains("not found"));
}

#[tokio::test]
async fn query_tool_rejects_empty_queries() {
    let (_dir, context) = test_context().await;

    let (_definition, query) = query_definition();
    let error = query(context, json!({"query": "  ", "connectionId": 1}))
        .await
        .expect_err("blank query should fail");
    assert!(error.to_string().contains("query"));
}

#[tokio::test]
async fn provider_search_and_details() {
    let (_dir, context) = test_context().await;

    let (_definition, search) = search_providers_definition();
    let response = search(context.clone(), json!({"query": "github"}))
        .await
        .expect("search succeeds");
    let results = &response.metadata.expect("metadata")["results"];
    assert!(results
        .as_array()
        .expect("array")
        .iter()
        .any(|summary| summary["key"] == "github"));

    let (_definition, details) = provider_details_definition();
    let response = details(context.clone(), json!({"key": "openweather"}))
        .await
        .expect("details succeed");
    let metadata = response.metadata.expect("metadata");
    assert_eq!(metadata["authType"], "api_key");
    assert!(metadata["endpoints"]
        .as_array()
        .expect("endpoints")
        .iter()
        .any(|endpoint| endpoint["path"] == "/weather"));

    let error = details(context, json!({"key": "nope"}))
        .await
        .expect_err("unknown provider should fail");
    assert!(error.to_string().contains("not found"));
}

#[tokio::test]
async fn settings_round_trip_with_defaults() {
    let (_dir, context) = test_context().await;

    let (_definition, get) = get_settings_definition();
    let response = get(context.clone(), json!({})).await.expect("get succeeds");
    let defaults = response.metadata.expect("metadata");
    assert_eq!(defaults["notifications"]["email"], true);

    let (_definition, save) = save_settings_definition();
    save(
        context.clone(),
        json!({"appearance": {"darkMode": true}}),
    )
    .await
    .expect("save succeeds");

    let response = get(context, json!({})).await.expect("get succeeds");
    let stored = response.metadata.expect("metadata");
    assert_eq!(stored["appearance"]["darkMode"], true);
    // Replacement semantics: the defaults are gone once anything is saved.
    assert!(stored.get("notifications").is_none());
}

#[tokio::test]
async fn history_tool_lists_recorded_queries() {
    let (_dir, context) = test_context().await;

    context
        .store
        .append_history(NewHistoryRecord {
            connection_id: 1,
            user_query: "list 5 repos".to_string(),
            interpretation: json!({"endpoint": "/"}),
            endpoint_url: "https://api.github.com/".to_string(),
            response_body: "{}".to_string(),
            status: QueryStatus::Success,
        })
        .await
        .expect("append succeeds");

    let (_definition, history) = query_history_definition();
    let response = history(context, json!({})).await.expect("history succeeds");
    assert!(response.content[0].text.contains("list 5 repos"));
    let entries = &response.metadata.expect("metadata")["entries"];
    assert_eq!(entries.as_array().map(Vec::len), Some(1));
    assert_eq!(entries[0]["status"], "success");
}
