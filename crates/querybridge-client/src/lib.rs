pub mod store;
pub mod types;

use std::collections::HashMap;
use std::time::Duration as StdDuration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::types::{AuthScheme, Connection, HttpMethod, Interpretation, ProbeOutcome};

const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// Candidate paths tried against an unknown API during a probe.
const GENERIC_PROBE_PATHS: &[&str] = &["/", "/api", "/v1", "/health", "/status", "/ping"];

/// How much upstream body text is kept when reporting a non-success status.
const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid header `{name}`: {reason}")]
    Header { name: String, reason: String },
    #[error("response body was not JSON: {0}")]
    Body(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    /// Applied uniformly to every dispatched call.
    pub timeout: StdDuration,
    /// Shorter cap used only while probing candidate endpoints.
    pub probe_timeout: StdDuration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "QueryBridge/1.0".to_string(),
            timeout: StdDuration::from_secs(30),
            probe_timeout: StdDuration::from_secs(10),
        }
    }
}

/// Outbound HTTP dispatcher. Performs exactly one call per interpreted
/// request; the probe variant walks a short candidate list instead.
#[derive(Debug)]
pub struct DispatchClient {
    http: Client,
    probe_http: Client,
    config: ClientConfig,
}

impl Default for DispatchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchClient {
    pub fn with_config(config: ClientConfig) -> Self {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .expect("failed to build reqwest client");
        let probe_http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.probe_timeout)
            .gzip(true)
            .build()
            .expect("failed to build reqwest client");

        Self {
            http,
            probe_http,
            config,
        }
    }

    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Final request URL: trimmed base plus the `/`-rooted endpoint.
    #[must_use]
    pub fn resolve_url(base_url: &str, endpoint: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), endpoint)
    }

    /// Candidate probe paths for a detected provider, or the generic list
    /// when the provider is unknown.
    #[must_use]
    pub fn probe_candidates(provider_key: Option<&str>) -> &'static [&'static str] {
        match provider_key {
            Some("openweather") => &["/weather?q=London", "/data/2.5/weather?q=London"],
            Some("github") => &["/user", "/repos", "/"],
            Some("openai") => &["/models", "/v1/models"],
            Some("stripe") => &["/charges", "/v1/charges"],
            Some("newsapi") => &["/everything?q=test", "/v2/everything?q=test"],
            Some("twitter") => &[
                "/2/tweets/search/recent?query=test",
                "/1.1/statuses/user_timeline.json",
            ],
            Some("youtube") => &["/search?part=snippet&q=test", "/v3/search?part=snippet&q=test"],
            Some("spotify") => &["/v1/search?q=test&type=track", "/search?q=test&type=track"],
            _ => GENERIC_PROBE_PATHS,
        }
    }

    /// Execute one HTTP call for an interpretation against a connection.
    ///
    /// GET carries the parameters as a query string; every other method
    /// sends them as a JSON body. Success is a 2xx status with a JSON
    /// body, returned as `(status, body)`.
    #[instrument(name = "dispatch_client.dispatch", skip(self, connection, interpretation), fields(method = %interpretation.method))]
    pub async fn dispatch(
        &self,
        connection: &Connection,
        interpretation: &Interpretation,
    ) -> Result<(u16, serde_json::Value), DispatchError> {
        let url = Self::resolve_url(&connection.base_url, &interpretation.endpoint);
        let headers = auth_headers(
            &connection.auth_type,
            &connection.auth_data,
            &connection.headers,
        )?;

        debug!(url = %url, "dispatching interpreted request");

        let request = match interpretation.method {
            HttpMethod::Get => self
                .http
                .get(&url)
                .headers(headers)
                .query(&interpretation.query_pairs()),
            other => self
                .http
                .request(into_reqwest_method(other), &url)
                .headers(headers)
                .json(&interpretation.params),
        };

        let response = request
            .send()
            .await
            .map_err(|error| DispatchError::Http(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::Status {
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_PREVIEW),
            });
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|error| DispatchError::Body(error.to_string()))?;

        Ok((status.as_u16(), body))
    }

    /// Issue a single capped GET and report the raw status and body size.
    /// Used by the probe loop and by credential checks.
    #[instrument(name = "dispatch_client.check_endpoint", skip(self, headers))]
    pub async fn check_endpoint(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<(u16, String), DispatchError> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            insert_header(&mut header_map, name, value)?;
        }

        let response = self
            .probe_http
            .get(url)
            .headers(header_map)
            .send()
            .await
            .map_err(|error| DispatchError::Http(error.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok((status, body))
    }

    /// Walk candidate endpoints until one answers, short-circuiting on
    /// credential and permission failures. 404 moves on to the next
    /// candidate; any other failure is remembered as the last error.
    #[instrument(name = "dispatch_client.probe", skip(self, auth_data, extra_headers, candidates))]
    pub async fn probe(
        &self,
        base_url: &str,
        auth_type: &AuthScheme,
        auth_data: &HashMap<String, String>,
        extra_headers: &HashMap<String, String>,
        candidates: &[&str],
    ) -> ProbeOutcome {
        let trimmed = base_url.trim_end_matches('/');
        let headers = match auth_headers(auth_type, auth_data, extra_headers) {
            Ok(map) => header_pairs(&map),
            Err(error) => {
                return ProbeOutcome::Unreachable {
                    attempted: Vec::new(),
                    last_error: Some(error.to_string()),
                }
            }
        };

        let mut attempted = Vec::with_capacity(candidates.len());
        let mut last_error = None;

        for candidate in candidates {
            let url = format!("{trimmed}{candidate}");
            attempted.push((*candidate).to_string());

            match self.check_endpoint(&url, &headers).await {
                Ok((status, body)) => match classify_probe_status(status) {
                    ProbeStep::Accept => {
                        return ProbeOutcome::Reachable {
                            endpoint: (*candidate).to_string(),
                            status,
                            body_bytes: body.len(),
                        }
                    }
                    ProbeStep::AuthFailure => {
                        return ProbeOutcome::AuthRejected {
                            endpoint: (*candidate).to_string(),
                        }
                    }
                    ProbeStep::PermissionFailure => {
                        return ProbeOutcome::PermissionDenied {
                            endpoint: (*candidate).to_string(),
                        }
                    }
                    ProbeStep::NextCandidate => {
                        last_error = Some(format!("endpoint {candidate} not found (404)"));
                    }
                    ProbeStep::RecordAndContinue => {
                        last_error = Some(format!(
                            "HTTP {status}: {}",
                            truncate(&body, ERROR_BODY_PREVIEW)
                        ));
                    }
                },
                Err(error) => {
                    last_error = Some(format!("request error on {candidate}: {error}"));
                }
            }
        }

        ProbeOutcome::Unreachable {
            attempted,
            last_error,
        }
    }
}

/// What the probe loop does with one observed status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProbeStep {
    Accept,
    AuthFailure,
    PermissionFailure,
    NextCandidate,
    RecordAndContinue,
}

pub(crate) fn classify_probe_status(status: u16) -> ProbeStep {
    match status {
        200 | 201 | 202 => ProbeStep::Accept,
        401 => ProbeStep::AuthFailure,
        403 => ProbeStep::PermissionFailure,
        404 => ProbeStep::NextCandidate,
        _ => ProbeStep::RecordAndContinue,
    }
}

/// Merge the connection's extra headers with its auth scheme.
///
/// `api_key` names its own header (falling back to `X-API-Key`); `bearer`
/// fills `Authorization`. `basic` is intentionally absent: reqwest's
/// built-in basic-auth support owns that scheme at the call site that
/// holds the credentials.
fn auth_headers(
    auth_type: &AuthScheme,
    auth_data: &HashMap<String, String>,
    extra_headers: &HashMap<String, String>,
) -> Result<HeaderMap, DispatchError> {
    let mut headers = HeaderMap::new();
    for (name, value) in extra_headers {
        insert_header(&mut headers, name, value)?;
    }

    match auth_type {
        AuthScheme::ApiKey => {
            if let Some(key) = auth_data.get("api_key") {
                let name = auth_data
                    .get("api_key_header")
                    .map_or(DEFAULT_API_KEY_HEADER, String::as_str);
                insert_header(&mut headers, name, key)?;
            }
        }
        AuthScheme::Bearer => {
            if let Some(token) = auth_data.get("token") {
                let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|error| {
                    DispatchError::Header {
                        name: AUTHORIZATION.to_string(),
                        reason: error.to_string(),
                    }
                })?;
                headers.insert(AUTHORIZATION, value);
            }
        }
        AuthScheme::Basic | AuthScheme::OAuth | AuthScheme::None => {}
    }

    Ok(headers)
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> Result<(), DispatchError> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|error| {
        DispatchError::Header {
            name: name.to_string(),
            reason: error.to_string(),
        }
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|error| DispatchError::Header {
        name: name.to_string(),
        reason: error.to_string(),
    })?;
    headers.insert(header_name, header_value);
    Ok(())
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

fn into_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let mut cut = max;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text[..cut].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_url_trims_trailing_slash() {
        assert_eq!(
            DispatchClient::resolve_url("https://api.github.com/", "/user/repos"),
            "https://api.github.com/user/repos"
        );
        assert_eq!(
            DispatchClient::resolve_url("https://api.github.com", "/"),
            "https://api.github.com/"
        );
    }

    #[test]
    fn api_key_scheme_sets_named_header() {
        let auth_data = HashMap::from([
            ("api_key".to_string(), "secret".to_string()),
            ("api_key_header".to_string(), "X-Custom-Key".to_string()),
        ]);
        let headers = auth_headers(&AuthScheme::ApiKey, &auth_data, &HashMap::new()).unwrap();
        assert_eq!(headers.get("X-Custom-Key").unwrap(), "secret");
    }

    #[test]
    fn api_key_scheme_defaults_header_name() {
        let auth_data = HashMap::from([("api_key".to_string(), "secret".to_string())]);
        let headers = auth_headers(&AuthScheme::ApiKey, &auth_data, &HashMap::new()).unwrap();
        assert_eq!(headers.get(DEFAULT_API_KEY_HEADER).unwrap(), "secret");
    }

    #[test]
    fn bearer_scheme_sets_authorization() {
        let auth_data = HashMap::from([("token".to_string(), "abc123".to_string())]);
        let headers = auth_headers(&AuthScheme::Bearer, &auth_data, &HashMap::new()).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc123");
    }

    #[test]
    fn basic_scheme_adds_no_auth_header() {
        let auth_data = HashMap::from([
            ("username".to_string(), "user".to_string()),
            ("password".to_string(), "pass".to_string()),
        ]);
        let headers = auth_headers(&AuthScheme::Basic, &auth_data, &HashMap::new()).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn extra_headers_survive_auth_merge() {
        let extra = HashMap::from([("X-Trace".to_string(), "1".to_string())]);
        let headers = auth_headers(&AuthScheme::None, &HashMap::new(), &extra).unwrap();
        assert_eq!(headers.get("X-Trace").unwrap(), "1");
    }

    #[test]
    fn probe_status_classification() {
        assert_eq!(classify_probe_status(200), ProbeStep::Accept);
        assert_eq!(classify_probe_status(201), ProbeStep::Accept);
        assert_eq!(classify_probe_status(202), ProbeStep::Accept);
        assert_eq!(classify_probe_status(401), ProbeStep::AuthFailure);
        assert_eq!(classify_probe_status(403), ProbeStep::PermissionFailure);
        assert_eq!(classify_probe_status(404), ProbeStep::NextCandidate);
        assert_eq!(classify_probe_status(500), ProbeStep::RecordAndContinue);
        assert_eq!(classify_probe_status(302), ProbeStep::RecordAndContinue);
    }

    #[test]
    fn known_providers_get_specific_probe_candidates() {
        assert_eq!(
            DispatchClient::probe_candidates(Some("github")),
            &["/user", "/repos", "/"]
        );
        assert_eq!(
            DispatchClient::probe_candidates(None),
            GENERIC_PROBE_PATHS
        );
        assert_eq!(
            DispatchClient::probe_candidates(Some("somewhere-new")),
            GENERIC_PROBE_PATHS
        );
    }
}
