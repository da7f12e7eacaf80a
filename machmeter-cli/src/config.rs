//! Configuration loading from machmeter.toml
//!
//! Optional; discovered by walking up from the current directory. CLI
//! flags override anything set here.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Machmeter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MachConfig {
    /// Runner configuration.
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Dataset cache configuration.
    #[serde(default)]
    pub data: DataConfig,
    /// Report output configuration.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunnerConfig {
    /// Worker count for multi-core runs (default: all available cores).
    #[serde(default)]
    pub workers: Option<usize>,
    /// Keep cached datasets on disk after the run.
    #[serde(default)]
    pub keep_data: bool,
}

/// Dataset cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Cache directory, relative to the working directory.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> String {
    machmeter_data::DEFAULT_CACHE_DIR.to_string()
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// Write a JSON score report to this path after every run.
    #[serde(default)]
    pub json_path: Option<String>,
}

impl MachConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory.
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("machmeter.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }
}
