use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use querybridge_client::store::JsonStore;
use querybridge_client::DispatchClient;

pub mod executor;
pub mod interpreter;
pub mod markdown;
pub mod registry;
pub mod state;
pub mod tools;
pub mod transport;

use state::AppContext;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Configuration inputs required to bootstrap the server core.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Optional override for the on-disk store location.
    pub store_dir: Option<PathBuf>,
    /// Timestamp captured during process initialization for diagnostics.
    pub boot_timestamp: OffsetDateTime,
    /// How the server transports requests/responses.
    pub mode: ServerMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
    Stdio,
    Headless,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            boot_timestamp: OffsetDateTime::now_utc(),
            mode: ServerMode::Stdio,
        }
    }
}

#[derive(Clone)]
pub struct CoreRuntime {
    config: ServerConfig,
    executor: executor::ToolExecutor,
}

impl CoreRuntime {
    pub fn executor(&self) -> executor::ToolExecutor {
        self.executor.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub async fn serve(&self) -> Result<()> {
        match self.config.mode {
            ServerMode::Stdio => transport::serve_stdio(self.executor.clone()).await?,
            ServerMode::Headless => {
                debug!(target: "querybridge_core", "Headless mode: skipping transport loop")
            }
        }
        Ok(())
    }
}

pub async fn bootstrap(config: ServerConfig) -> Result<CoreRuntime> {
    let store_dir = config
        .store_dir
        .clone()
        .unwrap_or_else(JsonStore::default_dir);
    let store = JsonStore::open(&store_dir).await?;

    let context = Arc::new(AppContext::new(DispatchClient::new(), Arc::new(store)));
    tools::register_tools(context.clone()).await;

    debug!(
        target: "querybridge_core",
        store_dir = %store_dir.display(),
        providers = context.registry.len(),
        "store and provider catalog initialized"
    );

    info!(
        target: "querybridge_core",
        store_dir = ?config.store_dir,
        boot_timestamp = %config.boot_timestamp,
        mode = ?config.mode,
        "Core server starting"
    );

    let executor = executor::ToolExecutor::builder(context).build();
    Ok(CoreRuntime { config, executor })
}

pub async fn run(config: ServerConfig) -> Result<()> {
    bootstrap(config).await?.serve().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn headless_bootstrap_completes() {
        let tmp = tempdir().expect("tempdir");
        let config = ServerConfig {
            store_dir: Some(tmp.path().to_path_buf()),
            mode: ServerMode::Headless,
            ..ServerConfig::default()
        };
        let runtime = bootstrap(config).await.expect("bootstrap succeeds");
        assert!(runtime.serve().await.is_ok());
    }

    #[tokio::test]
    async fn bootstrap_registers_the_tool_surface() {
        let tmp = tempdir().expect("tempdir");
        let config = ServerConfig {
            store_dir: Some(tmp.path().to_path_buf()),
            mode: ServerMode::Headless,
            ..ServerConfig::default()
        };
        let runtime = bootstrap(config).await.expect("bootstrap succeeds");
        let names: Vec<String> = runtime
            .executor()
            .list_tools()
            .await
            .into_iter()
            .map(|definition| definition.name)
            .collect();
        for expected in [
            "query",
            "test_connection",
            "register_connection",
            "list_providers",
            "query_history",
        ] {
            assert!(names.iter().any(|name| name == expected), "{expected} missing");
        }
    }
}

pub use executor::{ToolExecutor, ToolExecutorBuilder, ToolExecutorError};
