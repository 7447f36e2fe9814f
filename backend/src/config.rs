//! Backend configuration, loaded from an optional YAML file.
//!
//! ```yaml
//! data_directory: /home/me/Documents/Kid Tracker
//! log_level: debug
//! ```
//!
//! Every field is optional. A missing file yields the defaults.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "KID_TRACKER_DATA_DIR";

/// Folder created under the user's documents directory
pub const DATA_FOLDER_NAME: &str = "Kid Tracker";

/// Used when neither the environment nor the platform names a location
pub const FALLBACK_DATA_DIR: &str = "./kid-tracker-data";

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Directory holding one JSON file per document key
    pub data_directory: PathBuf,
    /// Filter directive used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl BackendConfig {
    /// Load from `path`. A missing file gives the defaults; an unreadable one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::from_yaml_str(&yaml)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Write the config as YAML, replacing any existing file atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let yaml = serde_yaml::to_string(self)?;
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, yaml)?;
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }
}

/// Default data directory for this machine
pub fn default_data_directory() -> PathBuf {
    resolve_data_directory(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from), dirs::document_dir())
}

/// Pick the data directory from an explicit override, then the documents
/// folder, then a relative fallback.
pub fn resolve_data_directory(env_override: Option<PathBuf>, documents_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = env_override.filter(|dir| !dir.as_os_str().is_empty()) {
        return dir;
    }
    match documents_dir {
        Some(docs) => docs.join(DATA_FOLDER_NAME),
        None => {
            warn!("Could not determine documents directory, falling back to {}", FALLBACK_DATA_DIR);
            PathBuf::from(FALLBACK_DATA_DIR)
        }
    }
}
