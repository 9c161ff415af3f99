//! Unified path management for lincd files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/lincd/             # Config directory
//! └── config.toml              # Service configuration
//!
//! ~/.local/share/lincd/        # Data directory
//! ├── store.toml               # TOML record store snapshot
//! └── logs/                    # Rolling log files
//!     └── lincd.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for lincd_core::LincdError {
    fn from(e: PathError) -> Self {
        lincd_core::LincdError::config(e.to_string())
    }
}

/// Kinds of file the service reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Store,
    Logs,
}

/// Resolves lincd paths, optionally under a custom base directory.
///
/// With a base directory every path lives directly beneath it, which keeps
/// tests inside a `TempDir`.
#[derive(Debug, Clone, Default)]
pub struct LincdPaths {
    base_dir: Option<PathBuf>,
}

const APP_DIR: &str = "lincd";

impl LincdPaths {
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the lincd configuration directory (e.g. `~/.config/lincd/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the lincd data directory (e.g. `~/.local/share/lincd/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the path for a service file or directory.
    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        Ok(match service {
            ServiceType::Config => self.config_dir()?.join("config.toml"),
            ServiceType::Store => self.data_dir()?.join("store.toml"),
            ServiceType::Logs => self.data_dir()?.join("logs"),
        })
    }
}
