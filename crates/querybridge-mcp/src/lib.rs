use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment};
use querybridge_core::{run, ServerConfig, ServerMode};

const ENV_PREFIX: &str = "QUERYBRIDGE";

/// Environment-driven settings, e.g. `QUERYBRIDGE_STORE_DIR=/var/lib/qb`
/// and `QUERYBRIDGE_HEADLESS=1`.
#[derive(Debug, Clone, Default)]
struct ServerSettings {
    store_dir: Option<PathBuf>,
    headless: bool,
}

/// Launches the stdio server using environment-informed defaults.
pub async fn run_server() -> Result<()> {
    let settings = load_settings()?;

    let config = ServerConfig {
        store_dir: settings.store_dir,
        mode: if settings.headless {
            ServerMode::Headless
        } else {
            ServerMode::Stdio
        },
        ..ServerConfig::default()
    };

    tracing::info!(
        target: "querybridge_mcp",
        store_dir = ?config.store_dir,
        mode = ?config.mode,
        "Starting server"
    );
    run(config).await
}

fn load_settings() -> Result<ServerSettings> {
    let source = Config::builder()
        .add_source(Environment::with_prefix(ENV_PREFIX))
        .build()
        .context("failed to read server environment settings")?;

    Ok(ServerSettings {
        store_dir: source.get_string("store_dir").ok().map(PathBuf::from),
        headless: source.get_bool("headless").unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_server_honors_headless_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::env::set_var("QUERYBRIDGE_STORE_DIR", dir.path());
        std::env::set_var("QUERYBRIDGE_HEADLESS", "1");
        let result = run_server().await;
        assert!(result.is_ok());
    }
}
