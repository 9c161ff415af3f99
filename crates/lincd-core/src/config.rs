//! Service configuration.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section and
//! field has a default, so an empty or missing file is a valid config.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default path that triggers view invalidation after a profile update.
pub const DEFAULT_PROFILE_EDIT_PATH: &str = "/profile/edit";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ServiceConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which `RecordStore` implementation backs the service.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    Toml,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Snapshot file for the TOML backend. Resolved under the data
    /// directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DirectoryConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,
    #[serde(default = "max_page_size")]
    pub max_page_size: i64,
}

fn default_page_size() -> i64 {
    10
}

fn max_page_size() -> i64 {
    100
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: max_page_size(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProfileConfig {
    /// Updates submitted from this path invalidate its cached view.
    #[serde(default = "edit_path")]
    pub edit_path: String,
}

fn edit_path() -> String {
    DEFAULT_PROFILE_EDIT_PATH.to_string()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            edit_path: edit_path(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "log_level")]
    pub level: String,
    /// Directory for daily rolling log files. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

fn log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: log_level(),
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.directory.default_page_size, 10);
        assert_eq!(config.directory.max_page_size, 100);
        assert_eq!(config.profile.edit_path, "/profile/edit");
        assert_eq!(config.store.backend, StoreBackend::Toml);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [store]
            backend = "memory"

            [directory]
            max_page_size = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.store.path.is_none());
        assert_eq!(config.directory.default_page_size, 10);
        assert_eq!(config.directory.max_page_size, 25);
    }
}
