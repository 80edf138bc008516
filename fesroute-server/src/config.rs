use std::path::{Path, PathBuf};
use std::time::Duration;

use fesroute_core::prelude::RoutingConfig;
use serde::Deserialize;

/// Server settings, read from a TOML file
///
/// ```toml
/// bind = "0.0.0.0:8080"
/// axes = "data/axes.json"
///
/// [routing]
/// max_snap_km = 1.0
/// fallback = "strict"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Axis snapshot loaded at startup (`.json` or `.csv`)
    pub axes: Option<PathBuf>,
    pub max_concurrent_requests: usize,
    pub request_timeout_secs: u64,
    pub routing: RoutingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            axes: None,
            max_concurrent_requests: 64,
            request_timeout_secs: 10,
            routing: RoutingConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {e}", path.display()))?;
        Ok(toml::from_str(&text)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
