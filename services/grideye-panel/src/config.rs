//! Configuration types for the grid-eye panel client

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PanelError, Result};
use crate::render::Profile;

/// Panel client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub panel: PanelConfig,
}

/// Sensor gateway connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path of the WebSocket endpoint on the gateway
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_seconds: u64,
}

impl GatewayConfig {
    /// WebSocket URL of the gateway endpoint
    pub fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        format!("ws://{}:{}{}", self.host, self.port, path)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            connection_timeout_seconds: default_connection_timeout(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_path() -> String {
    "/ws".to_string()
}

fn default_connection_timeout() -> u64 {
    10
}

/// Layout of the panel: which rule profile applies and how large the grids are
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default = "default_heat_grid_size")]
    pub heat_grid_rows: usize,
    #[serde(default = "default_heat_grid_size")]
    pub heat_grid_columns: usize,
    #[serde(default = "default_binary_grid_size")]
    pub binary_grid_rows: usize,
    #[serde(default = "default_binary_grid_size")]
    pub binary_grid_columns: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            heat_grid_rows: default_heat_grid_size(),
            heat_grid_columns: default_heat_grid_size(),
            binary_grid_rows: default_binary_grid_size(),
            binary_grid_columns: default_binary_grid_size(),
        }
    }
}

fn default_heat_grid_size() -> usize {
    64
}

fn default_binary_grid_size() -> usize {
    8
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    if config.gateway.port == 0 {
        return Err(PanelError::Config("gateway.port must not be 0".to_string()));
    }
    Ok(config)
}
