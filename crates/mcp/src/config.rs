// Server configuration: optional TOML file overlaid by command-line flags

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Directory every path argument is confined to; set from the CLI, not the file
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub resources: ResourcesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_server_name")]
    pub name: String,
}

fn default_server_name() -> String {
    "atelier".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum filesystem entries a single traversal may visit
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_max_entries() -> usize {
    atelier_core::analysis::WalkBudget::DEFAULT_MAX_ENTRIES
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached templated reads
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

fn default_cache_ttl_secs() -> u64 {
    30
}

fn default_cache_capacity() -> u64 {
    256
}

fn default_max_file_bytes() -> u64 {
    1024 * 1024
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

/// Logging settings, resolved once at startup and handed to `init_tracing`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `atelier_mcp=debug`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl ServerConfig {
    /// Load `config_path` if it exists, otherwise fall back to defaults
    pub fn load(config_path: &Path, root: PathBuf) -> Result<Self> {
        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")?
        } else {
            Self::default()
        };

        config.root = root;
        Ok(config)
    }

    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.resources.cache_ttl_secs)
    }
}
