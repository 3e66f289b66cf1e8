//! Server configuration

use seacloud_filer::FilerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// SeaweedFS filer URL
    pub filer_url: String,
    /// Filer root segment holding all user files
    pub filer_root: String,
    /// Filer request timeout (seconds)
    pub filer_timeout_secs: u64,
    /// Forward downloads as streams instead of buffering them
    pub stream_downloads: bool,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Page size used when a listing request has no limit
    pub default_page_size: usize,
    /// Largest accepted listing limit
    pub max_page_size: usize,
    /// CORS allowed origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            filer_url: "http://localhost:8888".to_string(),
            filer_root: "buckets".to_string(),
            filer_timeout_secs: 30,
            stream_downloads: false,
            max_body_size: 100 * 1024 * 1024, // 100 MB
            default_page_size: 100,
            max_page_size: 1000,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Filer client settings derived from this config
    pub fn filer_config(&self) -> FilerConfig {
        FilerConfig::new(&self.filer_url)
            .with_root(&self.filer_root)
            .with_timeout(Duration::from_secs(self.filer_timeout_secs))
    }

    /// Parse a comma-separated origin list, as found in `ALLOW_ORIGINS`
    pub fn parse_origins(origins: &str) -> Vec<String> {
        origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }
}
