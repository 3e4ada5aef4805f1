//! Application context for the easyrest CLI.
//!
//! Provides a unified context that combines CLI arguments with the
//! lazily-loaded configuration and entity service.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use once_cell::unsync::OnceCell;
use tracing::debug;

use easyrest_core::{
    ApiDeclaration, Cache, EntityService, MemoryCache, MemoryRepo, NoCache, Repo,
    SchemaRegistry, SqliteRepo,
};

use crate::cache::{cache_socket_path, DaemonCache};
use crate::cli::Cli;
use crate::config::{read_config, CacheBackend, EasyrestConfig};

use super::resolver::{resolve_config_path, resolve_schemas_path, resolve_store, StoreTarget};

struct LoadedConfig {
    config: EasyrestConfig,
    path: Option<PathBuf>,
}

/// Application context that bundles CLI args with configuration and the
/// entity service.
///
/// Nothing is read from disk until a handler asks for it, so commands such
/// as `completions` work without any configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<LoadedConfig>,
    service: OnceCell<EntityService>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            service: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the configuration, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&EasyrestConfig> {
        Ok(&self.loaded_config()?.config)
    }

    /// Get the entity service, building it on first use.
    pub fn service(&self) -> anyhow::Result<&EntityService> {
        self.service.get_or_try_init(|| self.build_service())
    }

    fn loaded_config(&self) -> anyhow::Result<&LoadedConfig> {
        self.config.get_or_try_init(|| {
            let path = resolve_config_path(self.cli)?;
            let config = match path.as_deref() {
                Some(path) => read_config(path)?,
                None => EasyrestConfig::default(),
            };
            Ok(LoadedConfig { config, path })
        })
    }

    fn build_service(&self) -> anyhow::Result<EntityService> {
        let loaded = self.loaded_config()?;
        let config = &loaded.config;
        let config_path = loaded.path.as_deref();

        let schemas_path = resolve_schemas_path(self.cli, config, config_path)?;
        let registry = load_registry(&schemas_path)?;

        let (repo, store_identity): (Arc<dyn Repo>, String) =
            match resolve_store(self.cli, config, config_path)? {
                StoreTarget::Sqlite(path) => {
                    let repo = SqliteRepo::open(&path)?;
                    let identity = path
                        .canonicalize()
                        .unwrap_or(path)
                        .to_string_lossy()
                        .to_string();
                    (Arc::new(repo), identity)
                }
                StoreTarget::Memory => (
                    Arc::new(MemoryRepo::new()),
                    format!("memory-{}", std::process::id()),
                ),
            };

        let cache: Arc<dyn Cache> = match config.cache.backend {
            CacheBackend::None => Arc::new(NoCache),
            CacheBackend::Memory => Arc::new(MemoryCache::new()),
            CacheBackend::Daemon => Arc::new(DaemonCache::new(
                cache_socket_path()?,
                &store_identity,
                Duration::from_secs(config.cache.daemon_idle_seconds),
            )),
        };

        debug!(
            schemas = registry.len(),
            store = %store_identity,
            cache = ?config.cache.backend,
            "entity service ready"
        );
        Ok(EntityService::new(registry, repo, cache).with_options(config.service_options()))
    }
}

/// Read and register the schema declarations at `path`.
pub fn load_registry(path: &Path) -> anyhow::Result<SchemaRegistry> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        anyhow::anyhow!("Failed to read schema declarations {}: {}", path.display(), e)
    })?;
    let declaration = ApiDeclaration::from_json_str(&contents).map_err(|e| {
        anyhow::anyhow!("Invalid schema declarations {}: {}", path.display(), e)
    })?;
    declaration
        .into_registry()
        .map_err(|e| anyhow::anyhow!("Invalid schema declarations {}: {}", path.display(), e))
}
