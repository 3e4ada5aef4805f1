use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use easyrest_core::ServiceOptions;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EasyrestConfig {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub cache: CacheSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServiceSection {
    /// Schema declarations file, relative to the config file
    pub schemas: Option<String>,
    pub default_page_size: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: StoreBackend,
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheSection {
    #[serde(default)]
    pub backend: CacheBackend,
    #[serde(default = "default_get_ttl_seconds")]
    pub get_ttl_seconds: u64,
    #[serde(default = "default_list_ttl_seconds")]
    pub list_ttl_seconds: u64,
    #[serde(default)]
    pub eager_list_invalidation: bool,
    /// Seconds an empty cache daemon waits before exiting
    #[serde(default = "default_daemon_idle_seconds")]
    pub daemon_idle_seconds: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            get_ttl_seconds: default_get_ttl_seconds(),
            list_ttl_seconds: default_list_ttl_seconds(),
            eager_list_invalidation: false,
            daemon_idle_seconds: default_daemon_idle_seconds(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    #[default]
    None,
    Memory,
    Daemon,
}

fn default_get_ttl_seconds() -> u64 {
    easyrest_core::service::DEFAULT_GET_TTL.as_secs()
}

fn default_list_ttl_seconds() -> u64 {
    easyrest_core::service::DEFAULT_LIST_TTL.as_secs()
}

fn default_daemon_idle_seconds() -> u64 {
    60
}

impl EasyrestConfig {
    /// Service tunables described by this config.
    pub fn service_options(&self) -> ServiceOptions {
        let defaults = ServiceOptions::default();
        ServiceOptions {
            get_ttl: Duration::from_secs(self.cache.get_ttl_seconds),
            list_ttl: Duration::from_secs(self.cache.list_ttl_seconds),
            default_page_size: self
                .service
                .default_page_size
                .filter(|size| *size > 0)
                .unwrap_or(defaults.default_page_size),
            eager_list_invalidation: self.cache.eager_list_invalidation,
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("easyrest.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<EasyrestConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("easyrest"));
        }
    }
    Ok(home_dir()?.join(".config").join("easyrest"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("easyrest"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("easyrest"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
