pub mod runtime;
pub use runtime::apply_overrides;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Complete console configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub location: LocationConfig,
}

/// REST backend connection
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:9010".to_string()
}

fn default_user_agent() -> String {
    "mockconsole/0.1".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// Initial table controls for list views
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_sort_key")]
    pub sort_key: String,
    /// Rows requested from the stats endpoint in one call
    #[serde(default = "default_stats_display_length")]
    pub stats_display_length: usize,
}

fn default_page_size() -> usize {
    10
}

fn default_sort_key() -> String {
    "name".to_string()
}

fn default_stats_display_length() -> usize {
    10_000
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort_key: default_sort_key(),
            stats_display_length: default_stats_display_length(),
        }
    }
}

/// Public address of the mock server, shown in service forms
#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    9010
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<ConsoleConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path))?;
    let config: ConsoleConfig =
        toml::from_str(&contents).with_context(|| format!("Failed to parse config {}", path))?;
    Ok(config)
}
