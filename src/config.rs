//! Application configuration management.
//!
//! The configuration is a TOML file with an ordered `roots` array of path
//! patterns. It is loaded once at startup; a missing or malformed file is
//! fatal, since without roots there is nothing to scan.
//!
//! ```toml
//! # dupescan.toml
//! roots = [
//!     "/home/user/photos",
//!     "/backup/**/*.jpg",
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Errors from configuration loading. All of them are fatal.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("Failed to determine project directories")]
    NoProjectDirs,

    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has the wrong shape.
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// TOML deserialization error
        #[source]
        source: toml::de::Error,
    },

    /// The config parsed but lists no roots.
    #[error("Config {0} lists no roots")]
    NoRoots(PathBuf),
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ordered root path patterns to scan. Order matters: it determines
    /// candidate enumeration order.
    pub roots: Vec<String>,
}

impl Config {
    /// Load the configuration from the given path, or from the default
    /// platform-specific location when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            source: e,
        })?;

        if config.roots.is_empty() {
            return Err(ConfigError::NoRoots(path));
        }

        log::debug!("Loaded {} root(s) from {}", config.roots.len(), path.display());
        Ok(config)
    }

    /// Default platform-specific configuration path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("", "", "dupescan").ok_or(ConfigError::NoProjectDirs)?;
        Ok(dirs.config_dir().join("dupescan.toml"))
    }

    /// Default platform-specific cache store path.
    pub fn default_cache_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("", "", "dupescan").ok_or(ConfigError::NoProjectDirs)?;
        Ok(dirs.data_dir().join("hashes.db"))
    }
}
