use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Config file read from the working directory when present.
const CONFIG_FILE: &str = "config.toml";

/// Application configuration, loaded from `config.toml` with per-field
/// defaults so a missing file yields a fully usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Feedback store settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the backing workbook file.
    pub feedback_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            feedback_path: PathBuf::from("data/feedback.xlsx"),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.toml` in the working directory,
    /// falling back to defaults when the file is absent.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from an explicit path. A missing file yields the
    /// default configuration; an unreadable or malformed file is an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
