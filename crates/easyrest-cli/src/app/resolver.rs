//! Path resolution for config, schema declarations, and the store.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_store_path, EasyrestConfig, StoreBackend};
use crate::errors::CliError;

/// Where documents live for this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Sqlite(PathBuf),
    Memory,
}

/// Resolve the config file path.
///
/// `--config` (or `EASYREST_CONFIG`) must point at an existing file; the
/// default location is optional and `None` when absent.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = cli.config.as_deref().filter(|p| !p.trim().is_empty()) {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(CliError::NotFound {
                message: format!("No config found at {}", path.display()),
                hint: None,
            }
            .into());
        }
        return Ok(Some(path));
    }

    let default = default_config_path()?;
    Ok(default.exists().then_some(default))
}

/// Resolve the schema declarations file from CLI args or config.
pub fn resolve_schemas_path(
    cli: &Cli,
    config: &EasyrestConfig,
    config_path: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.schemas.as_deref() {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.service.schemas.as_deref() {
        return Ok(relative_to_config(path, config_path));
    }
    Err(CliError::NotFound {
        message: "No schema declarations configured".to_string(),
        hint: Some(
            "Hint: Pass --schemas <FILE> or set `schemas` under [service] in the config file."
                .to_string(),
        ),
    }
    .into())
}

/// Resolve the store from CLI args or config.
pub fn resolve_store(
    cli: &Cli,
    config: &EasyrestConfig,
    config_path: Option<&Path>,
) -> anyhow::Result<StoreTarget> {
    if let Some(path) = cli.store.as_deref() {
        return Ok(StoreTarget::Sqlite(PathBuf::from(path)));
    }
    match config.store.backend {
        StoreBackend::Memory => Ok(StoreTarget::Memory),
        StoreBackend::Sqlite => match config.store.path.as_deref() {
            Some(path) => Ok(StoreTarget::Sqlite(relative_to_config(path, config_path))),
            None => Ok(StoreTarget::Sqlite(default_store_path()?)),
        },
    }
}

fn relative_to_config(path: &str, config_path: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        return path;
    }
    match config_path.and_then(Path::parent) {
        Some(dir) => dir.join(path),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("easyrest").chain(args.iter().copied()))
    }

    #[test]
    fn test_relative_paths_follow_config_file() {
        let config: EasyrestConfig =
            toml::from_str("[service]\nschemas = \"api.json\"\n[store]\npath = \"data/x.db\"\n")
                .unwrap();
        let config_path = Path::new("/etc/easyrest/config.toml");
        let cli = cli(&["schemas"]);

        assert_eq!(
            resolve_schemas_path(&cli, &config, Some(config_path)).unwrap(),
            PathBuf::from("/etc/easyrest/api.json")
        );
        assert_eq!(
            resolve_store(&cli, &config, Some(config_path)).unwrap(),
            StoreTarget::Sqlite(PathBuf::from("/etc/easyrest/data/x.db"))
        );
    }

    #[test]
    fn test_flags_override_config() {
        let config: EasyrestConfig =
            toml::from_str("[service]\nschemas = \"api.json\"\n[store]\nbackend = \"memory\"\n")
                .unwrap();
        let cli = cli(&["--schemas", "/tmp/s.json", "--store", "/tmp/s.db", "schemas"]);

        assert_eq!(
            resolve_schemas_path(&cli, &config, None).unwrap(),
            PathBuf::from("/tmp/s.json")
        );
        assert_eq!(
            resolve_store(&cli, &config, None).unwrap(),
            StoreTarget::Sqlite(PathBuf::from("/tmp/s.db"))
        );
    }

    #[test]
    fn test_missing_schemas_is_not_found() {
        let cli = cli(&["schemas"]);
        let err = resolve_schemas_path(&cli, &EasyrestConfig::default(), None).unwrap_err();
        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert!(matches!(cli_err, CliError::NotFound { .. }));
    }

    #[test]
    fn test_memory_backend() {
        let config: EasyrestConfig = toml::from_str("[store]\nbackend = \"memory\"\n").unwrap();
        let cli = cli(&["schemas"]);
        assert_eq!(
            resolve_store(&cli, &config, None).unwrap(),
            StoreTarget::Memory
        );
    }
}
