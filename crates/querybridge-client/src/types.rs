use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// How a connection authenticates against its upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthScheme {
    #[serde(rename = "api_key")]
    ApiKey,
    #[serde(rename = "bearer")]
    Bearer,
    #[serde(rename = "basic")]
    Basic,
    #[serde(rename = "oauth")]
    OAuth,
    #[serde(rename = "none")]
    None,
}

impl AuthScheme {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApiKey => "api_key",
            Self::Bearer => "bearer",
            Self::Basic => "basic",
            Self::OAuth => "oauth",
            Self::None => "none",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "api_key" => Ok(Self::ApiKey),
            "bearer" => Ok(Self::Bearer),
            "basic" => Ok(Self::Basic),
            "oauth" => Ok(Self::OAuth),
            "none" => Ok(Self::None),
            other => Err(format!("unknown auth scheme: {other}")),
        }
    }
}

/// HTTP method of an interpreted request. The interpreter never emits
/// anything outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    #[must_use]
    pub fn is_get(&self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single extracted request parameter. Queries only ever yield plain
/// strings and bare integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Text(String),
}

impl ParamValue {
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// The structured result of translating free text into a request shape.
///
/// `endpoint` may still contain unresolved `{placeholder}` segments copied
/// from the provider catalog. `filters` is reserved and stays empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Interpretation {
    pub endpoint: String,
    pub method: HttpMethod,
    pub params: BTreeMap<String, ParamValue>,
    pub filters: BTreeMap<String, ParamValue>,
}

impl Interpretation {
    /// Parameters rendered as query-string pairs for GET dispatch.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(key, value)| (key.clone(), value.render()))
            .collect()
    }
}

/// A registered upstream API endpoint. Soft-deleted by clearing
/// `is_active`; rows are never physically removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: i64,
    pub name: String,
    pub base_url: String,
    pub auth_type: AuthScheme,
    #[serde(default)]
    pub auth_data: HashMap<String, String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Input for registering a connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewConnection {
    pub name: String,
    pub base_url: String,
    pub auth_type: AuthScheme,
    #[serde(default)]
    pub auth_data: HashMap<String, String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Success,
    Error,
    Pending,
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Pending => "pending",
        };
        f.write_str(label)
    }
}

/// Write-once audit record of a dispatched query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub connection_id: i64,
    pub user_query: String,
    pub interpretation: serde_json::Value,
    pub endpoint_url: String,
    pub response_body: String,
    pub status: QueryStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHistoryRecord {
    pub connection_id: i64,
    pub user_query: String,
    pub interpretation: serde_json::Value,
    pub endpoint_url: String,
    pub response_body: String,
    pub status: QueryStatus,
}

/// A stored upstream credential, scoped to the single implicit user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredApiKey {
    pub id: i64,
    pub name: String,
    pub service: String,
    pub key_value: String,
    pub status: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_used: Option<OffsetDateTime>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApiKey {
    pub name: String,
    pub service: String,
    pub key_value: String,
}

/// Partial update applied to a stored key; absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeyUpdate {
    pub name: Option<String>,
    pub service: Option<String>,
    pub key_value: Option<String>,
    pub status: Option<String>,
}

/// User settings, organized as category -> key -> JSON value.
pub type SettingsMap = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

/// Result of probing a candidate endpoint list before trusting a new
/// connection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// A candidate answered 200/201/202.
    Reachable {
        endpoint: String,
        status: u16,
        body_bytes: usize,
    },
    /// A 401 answer; trying further candidates cannot fix credentials.
    AuthRejected { endpoint: String },
    /// A 403 answer; permissions (or rate limits) block access.
    PermissionDenied { endpoint: String },
    /// Every candidate was exhausted.
    Unreachable {
        attempted: Vec<String>,
        last_error: Option<String>,
    },
}

impl ProbeOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Reachable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_scheme_round_trips_through_serde() {
        for (scheme, tag) in [
            (AuthScheme::ApiKey, "\"api_key\""),
            (AuthScheme::Bearer, "\"bearer\""),
            (AuthScheme::Basic, "\"basic\""),
            (AuthScheme::OAuth, "\"oauth\""),
            (AuthScheme::None, "\"none\""),
        ] {
            let encoded = serde_json::to_string(&scheme).unwrap();
            assert_eq!(encoded, tag);
            let decoded: AuthScheme = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, scheme);
        }
    }

    #[test]
    fn interpretation_defaults_to_get() {
        let interpretation = Interpretation::default();
        assert_eq!(interpretation.method, HttpMethod::Get);
        assert!(interpretation.endpoint.is_empty());
        assert!(interpretation.params.is_empty());
        assert!(interpretation.filters.is_empty());
    }

    #[test]
    fn param_values_render_for_query_strings() {
        let mut interpretation = Interpretation::default();
        interpretation
            .params
            .insert("q".to_string(), ParamValue::from("london"));
        interpretation
            .params
            .insert("limit".to_string(), ParamValue::from(5));

        let pairs = interpretation.query_pairs();
        assert!(pairs.contains(&("q".to_string(), "london".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "5".to_string())));
    }

    #[test]
    fn untagged_param_value_prefers_integers() {
        let value: ParamValue = serde_json::from_str("5").unwrap();
        assert_eq!(value, ParamValue::Int(5));
        let value: ParamValue = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(value, ParamValue::Text("5".to_string()));
    }
}
