use std::collections::HashMap;
use std::sync::Arc;

use querybridge_client::types::{AuthScheme, Connection, HttpMethod, ParamValue};
use querybridge_core::interpreter::QueryInterpreter;
use querybridge_core::registry::ProviderRegistry;
use time::OffsetDateTime;

fn connection(base_url: &str) -> Connection {
    Connection {
        id: 1,
        name: "test".to_string(),
        base_url: base_url.to_string(),
        auth_type: AuthScheme::None,
        auth_data: HashMap::new(),
        headers: HashMap::new(),
        is_active: true,
        created_at: OffsetDateTime::now_utc(),
    }
}

fn interpreter() -> QueryInterpreter {
    QueryInterpreter::new(Arc::new(ProviderRegistry::new()))
}

#[test]
fn keyword_scoring_selects_the_posts_endpoint() {
    let interpretation = interpreter().interpret(
        "show me the blog articles",
        &connection("https://wordpress.example.com/wp-json/wp/v2"),
    );
    assert_eq!(interpretation.endpoint, "/posts");
}

#[test]
fn quoted_search_terms_keep_their_case() {
    let interpretation = interpreter().interpret(
        "get tweets containing 'hello world'",
        &connection("https://api.twitter.com/2"),
    );
    assert_eq!(
        interpretation.params.get("query"),
        Some(&ParamValue::Text("hello world".to_string()))
    );

    let interpretation = interpreter().interpret(
        "get tweets containing 'Hello World'",
        &connection("https://api.twitter.com/2"),
    );
    assert_eq!(
        interpretation.params.get("query"),
        Some(&ParamValue::Text("Hello World".to_string()))
    );
}

#[test]
fn bare_integers_populate_both_pagination_parameters() {
    let interpretation =
        interpreter().interpret("list 5 repos", &connection("https://api.github.com"));
    assert_eq!(interpretation.params.get("per_page"), Some(&ParamValue::Int(5)));
    assert_eq!(interpretation.params.get("limit"), Some(&ParamValue::Int(5)));
}

#[test]
fn unmatched_queries_default_to_get_root() {
    let interpretation = interpreter().interpret(
        "ping the service",
        &connection("https://api.unknown-host.example"),
    );
    assert_eq!(interpretation.method, HttpMethod::Get);
    assert_eq!(interpretation.endpoint, "/");
    assert!(interpretation.params.is_empty());
}

#[test]
fn subreddit_queries_rewrite_the_endpoint_path() {
    let interpretation = interpreter().interpret(
        "show hot posts from subreddit rust",
        &connection("https://oauth.reddit.com"),
    );
    assert_eq!(interpretation.endpoint, "/r/rust");
}

#[test]
fn weather_queries_extract_a_location() {
    let interpretation = interpreter().interpret(
        "weather for london",
        &connection("https://api.openweathermap.org/data/2.5"),
    );
    assert_eq!(interpretation.endpoint, "/weather");
    assert_eq!(
        interpretation.params.get("q"),
        Some(&ParamValue::Text("london".to_string()))
    );
}

#[test]
fn forecast_keywords_pick_the_forecast_endpoint() {
    let interpretation = interpreter().interpret(
        "forecast for berlin",
        &connection("https://api.openweathermap.org/data/2.5"),
    );
    assert_eq!(interpretation.endpoint, "/forecast");
    assert_eq!(
        interpretation.params.get("q"),
        Some(&ParamValue::Text("berlin".to_string()))
    );
}

#[test]
fn generic_fallback_maps_rest_verbs_and_nouns() {
    let base = "https://api.unknown-host.example";

    let interpretation = interpreter().interpret("create a user account", &connection(base));
    assert_eq!(interpretation.method, HttpMethod::Post);
    assert_eq!(interpretation.endpoint, "/users");

    let interpretation = interpreter().interpret("delete stale comments", &connection(base));
    assert_eq!(interpretation.method, HttpMethod::Delete);
    assert_eq!(interpretation.endpoint, "/comments");

    let interpretation = interpreter().interpret("fetch everything", &connection(base));
    assert_eq!(interpretation.method, HttpMethod::Get);
    assert_eq!(interpretation.endpoint, "/");
}

#[test]
fn github_commit_queries_extract_author() {
    let interpretation = interpreter().interpret(
        "commits by author octocat",
        &connection("https://api.github.com"),
    );
    assert_eq!(interpretation.endpoint, "/repos/{owner}/{repo}/commits");
    assert_eq!(
        interpretation.params.get("author"),
        Some(&ParamValue::Text("octocat".to_string()))
    );
}

#[test]
fn zero_scores_leave_only_the_root_endpoint() {
    // A catalogued provider whose keywords all miss: no endpoint is
    // selected, and the invariant pins the path to `/`.
    let interpretation = interpreter().interpret(
        "synchronize the flux capacitor",
        &connection("https://api.twitter.com/2"),
    );
    assert_eq!(interpretation.endpoint, "/");
    assert_eq!(interpretation.method, HttpMethod::Get);
}

#[test]
fn news_queries_collect_search_and_country() {
    let interpretation = interpreter().interpret(
        "search news about 'climate change' for country Germany",
        &connection("https://newsapi.org/v2"),
    );
    assert_eq!(interpretation.endpoint, "/everything");
    assert_eq!(
        interpretation.params.get("q"),
        Some(&ParamValue::Text("climate change".to_string()))
    );
    assert_eq!(
        interpretation.params.get("country"),
        Some(&ParamValue::Text("ge".to_string()))
    );
}
