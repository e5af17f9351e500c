mod json;

pub use json::JsonStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{
    ApiKeyUpdate, Connection, HistoryRecord, NewApiKey, NewConnection, NewHistoryRecord,
    SettingsMap, StoredApiKey,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization failure: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Persistent records behind the query pipeline: registered connections,
/// the append-only query history, user settings, and stored API keys.
///
/// Connections and API keys are soft-deleted; history rows are write-once.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_connection(&self, new_connection: NewConnection) -> Result<i64, StoreError>;
    /// Fetch by id regardless of the active flag.
    async fn get_connection(&self, id: i64) -> Result<Connection, StoreError>;
    /// Active connections only, in insertion order.
    async fn list_connections(&self) -> Result<Vec<Connection>, StoreError>;
    async fn deactivate_connection(&self, id: i64) -> Result<(), StoreError>;

    async fn append_history(&self, record: NewHistoryRecord) -> Result<i64, StoreError>;
    /// Newest-first, capped at `limit`.
    async fn recent_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError>;

    async fn get_settings(&self) -> Result<SettingsMap, StoreError>;
    /// Whole-document replacement; previous settings are discarded.
    async fn replace_settings(&self, settings: SettingsMap) -> Result<(), StoreError>;

    async fn create_api_key(&self, new_key: NewApiKey) -> Result<i64, StoreError>;
    async fn get_api_key(&self, id: i64) -> Result<StoredApiKey, StoreError>;
    async fn list_api_keys(&self) -> Result<Vec<StoredApiKey>, StoreError>;
    async fn update_api_key(&self, id: i64, update: ApiKeyUpdate) -> Result<(), StoreError>;
    async fn deactivate_api_key(&self, id: i64) -> Result<(), StoreError>;
    /// Stamp `last_used` and set the status label, returning the fresh row.
    async fn touch_api_key(&self, id: i64, status: &str) -> Result<StoredApiKey, StoreError>;
}
