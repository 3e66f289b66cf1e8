//! Filer client configuration

use std::time::Duration;

/// Filer client configuration
#[derive(Clone, Debug)]
pub struct FilerConfig {
    /// Filer endpoint URL
    pub endpoint: String,
    /// Remote root segment that holds all user-visible entries
    pub root: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for FilerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8888".to_string(),
            root: "buckets".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("seacloud-filer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FilerConfig {
    /// Create a new config with the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the remote root segment
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Root segment without surrounding slashes
    pub fn root_segment(&self) -> &str {
        self.root.trim_matches('/')
    }
}
