//! Application state

use crate::config::ServerConfig;
use seacloud_filer::FileGateway;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// File gateway over the filer
    pub files: FileGateway,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let files = FileGateway::from_config(config.filer_config())?;
        info!(filer = %config.filer_url, root = %config.filer_root, "File gateway ready");

        Ok(Self::with_gateway(config, files))
    }

    /// Create state around an already built gateway
    pub fn with_gateway(config: ServerConfig, files: FileGateway) -> Self {
        Self { config, files }
    }
}
