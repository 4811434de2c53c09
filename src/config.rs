//! Configuration for nativeterm.
//!
//! Loaded from `~/.nativeterm/config.toml`; every key is optional:
//!
//! ```toml
//! [resources]
//! namespace = "nativeterm/native"
//! library = "nativeterm"
//! # Packaging directory used by `nativeterm register` when none is given
//! artifact_root = "target/native"
//!
//! [logging]
//! level = "info"          # error, warn, info, debug, trace
//! file = "nativeterm.log" # omit to log to stderr
//! ```
//!
//! The `NATIVETERM_LOG` environment variable overrides `logging.level` with a
//! full `tracing` filter directive.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::registrar::ResourceLayout;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Native artifact naming
    pub resources: ResourcesConfig,
    /// Log output
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    pub namespace: String,
    pub library: String,
    pub artifact_root: Option<PathBuf>,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        let layout = ResourceLayout::default();
        Self {
            namespace: layout.namespace,
            library: layout.library,
            artifact_root: None,
        }
    }
}

impl ResourcesConfig {
    pub fn layout(&self) -> ResourceLayout {
        ResourceLayout {
            namespace: self.namespace.clone(),
            library: self.library.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                match fs::read_to_string(&path) {
                    Ok(content) => match Self::parse(&content) {
                        Ok(config) => return config,
                        Err(e) => warn!("Ignoring invalid {}: {}", path.display(), e),
                    },
                    Err(e) => warn!("Could not read {}: {}", path.display(), e),
                }
            }
        }
        Self::default()
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".nativeterm").join("config.toml"))
    }
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}
