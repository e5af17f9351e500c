use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use time::OffsetDateTime;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::{Store, StoreError};
use crate::types::{
    ApiKeyUpdate, Connection, HistoryRecord, NewApiKey, NewConnection, NewHistoryRecord,
    SettingsMap, StoredApiKey,
};

const CONNECTIONS_FILE: &str = "connections.json";
const HISTORY_FILE: &str = "history.json";
const API_KEYS_FILE: &str = "api_keys.json";
const SETTINGS_FILE: &str = "settings.json";

/// File-backed store: one JSON document per record family under a data
/// directory, with in-memory maps serving reads.
#[derive(Debug)]
pub struct JsonStore {
    root: PathBuf,
    connections: DashMap<i64, Connection>,
    history: Mutex<Vec<HistoryRecord>>,
    api_keys: DashMap<i64, StoredApiKey>,
    settings: RwLock<SettingsMap>,
    connection_seq: AtomicI64,
    history_seq: AtomicI64,
    key_seq: AtomicI64,
    flush_lock: Mutex<()>,
}

impl JsonStore {
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;

        let connection_rows: Vec<Connection> = load_rows(&root, CONNECTIONS_FILE).await?;
        let history_rows: Vec<HistoryRecord> = load_rows(&root, HISTORY_FILE).await?;
        let key_rows: Vec<StoredApiKey> = load_rows(&root, API_KEYS_FILE).await?;
        let settings = load_settings(&root).await?;

        let connection_seq = next_id(connection_rows.iter().map(|row| row.id));
        let history_seq = next_id(history_rows.iter().map(|row| row.id));
        let key_seq = next_id(key_rows.iter().map(|row| row.id));

        let connections = DashMap::new();
        for row in connection_rows {
            connections.insert(row.id, row);
        }
        let api_keys = DashMap::new();
        for row in key_rows {
            api_keys.insert(row.id, row);
        }

        debug!(
            target: "querybridge_store",
            root = %root.display(),
            connections = connections.len(),
            history = history_rows.len(),
            "store opened"
        );

        Ok(Self {
            root,
            connections,
            history: Mutex::new(history_rows),
            api_keys,
            settings: RwLock::new(settings),
            connection_seq: AtomicI64::new(connection_seq),
            history_seq: AtomicI64::new(history_seq),
            key_seq: AtomicI64::new(key_seq),
            flush_lock: Mutex::new(()),
        })
    }

    /// Platform data directory used when no explicit path is configured.
    #[must_use]
    pub fn default_dir() -> PathBuf {
        let project_dirs = ProjectDirs::from("com", "QueryBridge", "querybridge")
            .expect("unable to resolve project directories");
        project_dirs.data_dir().to_path_buf()
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn flush_connections(&self) -> Result<(), StoreError> {
        let _guard = self.flush_lock.lock().await;
        let mut rows: Vec<Connection> = self
            .connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.id);
        write_rows(&self.root, CONNECTIONS_FILE, &rows).await
    }

    async fn flush_api_keys(&self) -> Result<(), StoreError> {
        let _guard = self.flush_lock.lock().await;
        let mut rows: Vec<StoredApiKey> = self
            .api_keys
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.id);
        write_rows(&self.root, API_KEYS_FILE, &rows).await
    }
}

#[async_trait]
impl Store for JsonStore {
    async fn create_connection(&self, new_connection: NewConnection) -> Result<i64, StoreError> {
        let id = self.connection_seq.fetch_add(1, Ordering::SeqCst);
        let connection = Connection {
            id,
            name: new_connection.name,
            base_url: new_connection.base_url,
            auth_type: new_connection.auth_type,
            auth_data: new_connection.auth_data,
            headers: new_connection.headers,
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        self.connections.insert(id, connection);
        self.flush_connections().await?;
        Ok(id)
    }

    async fn get_connection(&self, id: i64) -> Result<Connection, StoreError> {
        self.connections
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound {
                entity: "connection",
                id,
            })
    }

    async fn list_connections(&self) -> Result<Vec<Connection>, StoreError> {
        let mut rows: Vec<Connection> = self
            .connections
            .iter()
            .filter(|entry| entry.value().is_active)
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    async fn deactivate_connection(&self, id: i64) -> Result<(), StoreError> {
        match self.connections.get_mut(&id) {
            Some(mut entry) => {
                entry.value_mut().is_active = false;
            }
            None => {
                return Err(StoreError::NotFound {
                    entity: "connection",
                    id,
                })
            }
        }
        self.flush_connections().await
    }

    async fn append_history(&self, record: NewHistoryRecord) -> Result<i64, StoreError> {
        let id = self.history_seq.fetch_add(1, Ordering::SeqCst);
        let row = HistoryRecord {
            id,
            connection_id: record.connection_id,
            user_query: record.user_query,
            interpretation: record.interpretation,
            endpoint_url: record.endpoint_url,
            response_body: record.response_body,
            status: record.status,
            created_at: OffsetDateTime::now_utc(),
        };

        let mut history = self.history.lock().await;
        history.push(row);
        write_rows(&self.root, HISTORY_FILE, &history).await?;
        Ok(id)
    }

    async fn recent_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        let history = self.history.lock().await;
        Ok(history.iter().rev().take(limit).cloned().collect())
    }

    async fn get_settings(&self) -> Result<SettingsMap, StoreError> {
        Ok(self.settings.read().await.clone())
    }

    async fn replace_settings(&self, settings: SettingsMap) -> Result<(), StoreError> {
        {
            let mut guard = self.settings.write().await;
            *guard = settings.clone();
        }
        let _guard = self.flush_lock.lock().await;
        let payload = serde_json::to_vec_pretty(&settings)?;
        fs::write(self.root.join(SETTINGS_FILE), payload).await?;
        Ok(())
    }

    async fn create_api_key(&self, new_key: NewApiKey) -> Result<i64, StoreError> {
        let id = self.key_seq.fetch_add(1, Ordering::SeqCst);
        let key = StoredApiKey {
            id,
            name: new_key.name,
            service: new_key.service,
            key_value: new_key.key_value,
            status: "Active".to_string(),
            last_used: None,
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        self.api_keys.insert(id, key);
        self.flush_api_keys().await?;
        Ok(id)
    }

    async fn get_api_key(&self, id: i64) -> Result<StoredApiKey, StoreError> {
        self.api_keys
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound {
                entity: "api key",
                id,
            })
    }

    async fn list_api_keys(&self) -> Result<Vec<StoredApiKey>, StoreError> {
        let mut rows: Vec<StoredApiKey> = self
            .api_keys
            .iter()
            .filter(|entry| entry.value().is_active)
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    async fn update_api_key(&self, id: i64, update: ApiKeyUpdate) -> Result<(), StoreError> {
        match self.api_keys.get_mut(&id) {
            Some(mut entry) => {
                let key = entry.value_mut();
                if let Some(name) = update.name {
                    key.name = name;
                }
                if let Some(service) = update.service {
                    key.service = service;
                }
                if let Some(key_value) = update.key_value {
                    key.key_value = key_value;
                }
                if let Some(status) = update.status {
                    key.status = status;
                }
            }
            None => {
                return Err(StoreError::NotFound {
                    entity: "api key",
                    id,
                })
            }
        }
        self.flush_api_keys().await
    }

    async fn deactivate_api_key(&self, id: i64) -> Result<(), StoreError> {
        match self.api_keys.get_mut(&id) {
            Some(mut entry) => {
                entry.value_mut().is_active = false;
            }
            None => {
                return Err(StoreError::NotFound {
                    entity: "api key",
                    id,
                })
            }
        }
        self.flush_api_keys().await
    }

    async fn touch_api_key(&self, id: i64, status: &str) -> Result<StoredApiKey, StoreError> {
        let updated = match self.api_keys.get_mut(&id) {
            Some(mut entry) => {
                let key = entry.value_mut();
                key.last_used = Some(OffsetDateTime::now_utc());
                key.status = status.to_string();
                key.clone()
            }
            None => {
                return Err(StoreError::NotFound {
                    entity: "api key",
                    id,
                })
            }
        };
        self.flush_api_keys().await?;
        Ok(updated)
    }
}

async fn load_rows<T: DeserializeOwned>(root: &Path, file: &str) -> Result<Vec<T>, StoreError> {
    let path = root.join(file);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = fs::read(path).await?;
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

async fn load_settings(root: &Path) -> Result<SettingsMap, StoreError> {
    let path = root.join(SETTINGS_FILE);
    if !path.exists() {
        return Ok(SettingsMap::new());
    }
    let bytes = fs::read(path).await?;
    if bytes.is_empty() {
        return Ok(SettingsMap::new());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

async fn write_rows<T: Serialize>(root: &Path, file: &str, rows: &[T]) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(rows)?;
    fs::write(root.join(file), payload).await?;
    Ok(())
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AuthScheme, QueryStatus};
    use serde_json::json;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn sample_connection(name: &str) -> NewConnection {
        NewConnection {
            name: name.to_string(),
            base_url: "https://api.github.com".to_string(),
            auth_type: AuthScheme::Bearer,
            auth_data: HashMap::from([("token".to_string(), "abc".to_string())]),
            headers: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn connection_round_trip() {
        let dir = tempdir().expect("tempdir");
        let store = JsonStore::open(dir.path()).await.unwrap();

        let id = store
            .create_connection(sample_connection("GitHub"))
            .await
            .unwrap();
        let connection = store.get_connection(id).await.unwrap();
        assert_eq!(connection.name, "GitHub");
        assert_eq!(connection.auth_type, AuthScheme::Bearer);
        assert!(connection.is_active);
    }

    #[tokio::test]
    async fn missing_connection_reports_not_found() {
        let dir = tempdir().expect("tempdir");
        let store = JsonStore::open(dir.path()).await.unwrap();

        let error = store.get_connection(42).await.unwrap_err();
        assert!(matches!(
            error,
            StoreError::NotFound {
                entity: "connection",
                id: 42
            }
        ));
    }

    #[tokio::test]
    async fn deactivated_connections_leave_listing_but_stay_fetchable() {
        let dir = tempdir().expect("tempdir");
        let store = JsonStore::open(dir.path()).await.unwrap();

        let first = store
            .create_connection(sample_connection("one"))
            .await
            .unwrap();
        let second = store
            .create_connection(sample_connection("two"))
            .await
            .unwrap();

        store.deactivate_connection(first).await.unwrap();

        let listed = store.list_connections().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, second);

        // Soft delete: the record itself is still there.
        let hidden = store.get_connection(first).await.unwrap();
        assert!(!hidden.is_active);
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempdir().expect("tempdir");
        let id = {
            let store = JsonStore::open(dir.path()).await.unwrap();
            store
                .create_connection(sample_connection("persisted"))
                .await
                .unwrap()
        };

        let reopened = JsonStore::open(dir.path()).await.unwrap();
        let connection = reopened.get_connection(id).await.unwrap();
        assert_eq!(connection.name, "persisted");

        // Ids keep counting after reopen instead of colliding.
        let next = reopened
            .create_connection(sample_connection("later"))
            .await
            .unwrap();
        assert!(next > id);
    }

    #[tokio::test]
    async fn history_is_returned_newest_first() {
        let dir = tempdir().expect("tempdir");
        let store = JsonStore::open(dir.path()).await.unwrap();

        for index in 0..3 {
            store
                .append_history(NewHistoryRecord {
                    connection_id: 1,
                    user_query: format!("query {index}"),
                    interpretation: json!({"endpoint": "/"}),
                    endpoint_url: "https://api.github.com/".to_string(),
                    response_body: "{}".to_string(),
                    status: QueryStatus::Success,
                })
                .await
                .unwrap();
        }

        let recent = store.recent_history(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].user_query, "query 2");
        assert_eq!(recent[1].user_query, "query 1");
    }

    #[tokio::test]
    async fn settings_replace_discards_previous_document() {
        let dir = tempdir().expect("tempdir");
        let store = JsonStore::open(dir.path()).await.unwrap();

        let mut first = SettingsMap::new();
        first
            .entry("appearance".to_string())
            .or_default()
            .insert("darkMode".to_string(), json!(true));
        store.replace_settings(first).await.unwrap();

        let mut second = SettingsMap::new();
        second
            .entry("api".to_string())
            .or_default()
            .insert("timeout".to_string(), json!(30));
        store.replace_settings(second).await.unwrap();

        let settings = store.get_settings().await.unwrap();
        assert!(settings.contains_key("api"));
        assert!(!settings.contains_key("appearance"));
    }

    #[tokio::test]
    async fn api_key_lifecycle() {
        let dir = tempdir().expect("tempdir");
        let store = JsonStore::open(dir.path()).await.unwrap();

        let id = store
            .create_api_key(NewApiKey {
                name: "prod".to_string(),
                service: "openai".to_string(),
                key_value: "sk-test".to_string(),
            })
            .await
            .unwrap();

        store
            .update_api_key(
                id,
                ApiKeyUpdate {
                    name: Some("production".to_string()),
                    ..ApiKeyUpdate::default()
                },
            )
            .await
            .unwrap();

        let touched = store.touch_api_key(id, "Invalid").await.unwrap();
        assert_eq!(touched.name, "production");
        assert_eq!(touched.status, "Invalid");
        assert!(touched.last_used.is_some());

        store.deactivate_api_key(id).await.unwrap();
        assert!(store.list_api_keys().await.unwrap().is_empty());
    }
}
