//! Configuration management for estatboard
//!
//! Default config location: ~/.estatboard/config.toml

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregations::{AggregationOptions, DuplicatePolicy, DEFAULT_ROOM_CUTOFF};
use crate::model::MissingCount;

pub const ENV_API_URL: &str = "ESTATBOARD_API_URL";
pub const ENV_API_TOKEN: &str = "ESTATBOARD_API_TOKEN";

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token issued by the login service.
    /// Override with ESTATBOARD_API_TOKEN env var
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AggregationConfig {
    /// Room count from which flats share one "N or more" row
    #[serde(default = "default_cutoff")]
    pub cutoff: u32,
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
    #[serde(default)]
    pub missing_count: MissingCount,
}

fn default_cutoff() -> u32 {
    DEFAULT_ROOM_CUTOFF
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            duplicates: DuplicatePolicy::default(),
            missing_count: MissingCount::default(),
        }
    }
}

impl AggregationConfig {
    pub fn options(&self) -> AggregationOptions {
        AggregationOptions {
            cutoff: self.cutoff,
            duplicates: self.duplicates,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter string
    /// Override with RUST_LOG env var
    #[serde(default = "default_level")]
    pub level: String,
    /// Log output format: "pretty" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info,estatboard=debug".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

/// Default config directory (~/.estatboard)
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".estatboard")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Expand ~ to home directory in path
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
        Ok(home.join(rest))
    } else if s == "~" {
        dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))
    } else {
        Ok(path.to_path_buf())
    }
}

impl Config {
    /// Load config from default location (~/.estatboard/config.toml)
    pub fn load() -> Result<Self> {
        Self::load_or_create(&default_config_path())
    }

    /// Load config from an existing file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let path = expand_tilde(config_path)?;
        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file path, or create default
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        let path = expand_tilde(config_path)?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Config::default();
            // Try to save default config
            if let Err(e) = config.save(&path) {
                tracing::debug!("Could not write default config to {}: {}", path.display(), e);
            }
            Ok(config)
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Apply ESTATBOARD_* overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.is_empty()) {
            self.api.token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.aggregation
            .options()
            .validate()
            .map_err(|e| anyhow!("[aggregation] {}", e))?;

        let url = url::Url::parse(&self.api.base_url)
            .map_err(|e| anyhow!("[api] invalid base_url '{}': {}", self.api.base_url, e))?;
        if url.cannot_be_a_base() {
            bail!("[api] base_url '{}' cannot be used as a base", self.api.base_url);
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            bail!(
                "[logging] format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            );
        }
        Ok(())
    }
}
