//! Configuration service implementation.
//!
//! Loads `ServiceConfig` from `config.toml` (by default
//! `~/.config/lincd/config.toml`), then applies environment overrides.

use crate::paths::{LincdPaths, ServiceType};
use crate::storage::AtomicTomlFile;
use lincd_core::config::ServiceConfig;
use lincd_core::{LincdError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Overrides `store.path`.
pub const ENV_STORE_PATH: &str = "LINCD_STORE_PATH";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "LINCD_LOG";

/// Configuration service that loads and caches the service configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    paths: LincdPaths,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ServiceConfig>>>,
}

impl ConfigService {
    /// Creates a service reading `path`, or the default config file when `None`.
    pub fn new(path: Option<&Path>) -> Result<Self> {
        let paths = LincdPaths::default();
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => paths.get_path(ServiceType::Config)?,
        };
        Ok(Self {
            path,
            paths,
            config: Arc::new(RwLock::new(None)),
        })
    }

    /// Creates a service rooted at `base_dir` (for testing).
    pub fn with_base_dir(base_dir: &Path) -> Result<Self> {
        let paths = LincdPaths::new(Some(base_dir));
        Ok(Self {
            path: paths.get_path(ServiceType::Config)?,
            paths,
            config: Arc::new(RwLock::new(None)),
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading it on first access.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn get_config(&self) -> Result<ServiceConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|e| LincdError::internal(format!("config cache poisoned: {}", e)))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        let mut write_lock = self
            .config
            .write()
            .map_err(|e| LincdError::internal(format!("config cache poisoned: {}", e)))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    /// The snapshot file for the TOML backend: `store.path` if set, else
    /// `store.toml` in the data directory.
    pub fn store_path(&self, config: &ServiceConfig) -> Result<PathBuf> {
        match &config.store.path {
            Some(path) => Ok(path.clone()),
            None => Ok(self.paths.get_path(ServiceType::Store)?),
        }
    }

    /// Directory for rolling log files: `logging.directory` if set, else
    /// `logs/` in the data directory.
    pub fn log_dir(&self, config: &ServiceConfig) -> Result<PathBuf> {
        match &config.logging.directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.paths.get_path(ServiceType::Logs)?),
        }
    }

    fn load_config(&self) -> Result<ServiceConfig> {
        let file = AtomicTomlFile::<ServiceConfig>::new(self.path.clone());
        let config = file
            .load()
            .map_err(|e| {
                LincdError::config(format!("cannot read {}: {}", self.path.display(), e))
            })?
            .unwrap_or_default();
        tracing::debug!(path = %self.path.display(), "loaded service config");
        Ok(apply_overrides(config, |key| std::env::var(key).ok()))
    }
}

/// Applies environment overrides through `lookup`.
pub fn apply_overrides(
    mut config: ServiceConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ServiceConfig {
    if let Some(path) = lookup(ENV_STORE_PATH).filter(|v| !v.trim().is_empty()) {
        config.store.path = Some(PathBuf::from(path));
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
        config.logging.level = level;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use lincd_core::config::StoreBackend;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_base_dir(temp_dir.path()).unwrap();

        let config = service.get_config().unwrap();
        assert_eq!(config.directory.default_page_size, 10);
        assert_eq!(
            service.store_path(&config).unwrap(),
            temp_dir.path().join("store.toml")
        );
    }

    #[test]
    fn test_reads_file_then_caches_until_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[store]\nbackend = \"memory\"\n\n[profile]\nedit_path = \"/me/edit\"\n",
        )
        .unwrap();
        let service = ConfigService::with_base_dir(temp_dir.path()).unwrap();

        let loaded = service.get_config().unwrap();
        assert_eq!(loaded.store.backend, StoreBackend::Memory);
        assert_eq!(loaded.profile.edit_path, "/me/edit");

        std::fs::write(&config_path, "[store]\nbackend = \"toml\"\n").unwrap();
        assert_eq!(service.get_config().unwrap().store.backend, StoreBackend::Memory);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().store.backend, StoreBackend::Toml);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.toml"), "[store\nbackend=").unwrap();
        let service = ConfigService::with_base_dir(temp_dir.path()).unwrap();

        assert!(service.get_config().unwrap_err().is_config());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_STORE_PATH, "/tmp/elsewhere.toml"),
            (ENV_LOG_LEVEL, "lincd=debug"),
        ]
        .into_iter()
        .collect();

        let config = apply_overrides(ServiceConfig::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });
        assert_eq!(
            config.store.path,
            Some(PathBuf::from("/tmp/elsewhere.toml"))
        );
        assert_eq!(config.logging.level, "lincd=debug");

        let untouched = apply_overrides(ServiceConfig::default(), |_| None);
        assert_eq!(untouched, ServiceConfig::default());
    }
}
