use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::{Context, Result};

use crate::engine::config::EngineConfig;

pub const DEFAULT_CONFIG_FILE: &str = "huffline.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print the tree structure after the code table.
    pub show_tree: bool,
    /// Print compression statistics after the decoded line.
    pub show_stats: bool,
}

impl AppConfig {
    /// An explicit path must exist; otherwise `huffline.toml` is used when
    /// present and defaults apply when it is not.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        match config_path {
            Some(path) => Self::read(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::read(DEFAULT_CONFIG_FILE),
            None => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn read(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path))?;
        tracing::info!("Loaded config from {}", path);
        Ok(config)
    }

    /// Writes `AppConfig::default()`, ignoring any existing file at `config_path`.
    pub fn write_default(config_path: &str) -> Result<()> {
        Self::default().save(config_path)
    }

    pub fn save(&self, config_path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}
