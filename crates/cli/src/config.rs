//! User configuration for rvc
//!
//! Stored at `~/.config/rvc/config.toml` (Linux/macOS) or
//! `%APPDATA%\rvc\config.toml` (Windows). Repositories carry no
//! configuration of their own; everything here is a per-user preference.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Used when neither the config nor the environment names the user
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// User-wide rvc configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub user: UserConfig,
    pub commit: CommitConfig,
    pub log: LogConfig,
}

/// Identity recorded in commits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Commit author (default: `$USER`)
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Message used when `rvc commit` is run without `-m`
    pub default_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Entries shown by `rvc log` (default: 20, 0 = all)
    pub limit: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

impl Config {
    /// Author for new commits: explicit override, config, `$USER`, then "unknown"
    pub fn author(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.user.name.clone())
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }

    /// `rvc log` limit, `None` meaning unlimited
    pub fn log_limit(&self, explicit: Option<usize>) -> Option<usize> {
        match explicit.unwrap_or(self.log.limit) {
            0 => None,
            n => Some(n),
        }
    }
}

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir().map(|h| h.join(".config/rvc"))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir().map(|c| c.join("rvc"))
    }
}

/// Get the config file path
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration, falling back to defaults when the file is absent
pub fn load() -> Result<Config> {
    let config_path = match config_file_path() {
        Some(p) => p,
        None => {
            tracing::debug!("Could not determine config directory, using defaults");
            return Ok(Config::default());
        }
    };

    if !config_path.exists() {
        tracing::debug!("Config not found at {}, using defaults", config_path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config at {}", config_path.display()))?;
    let config = parse(&content)
        .with_context(|| format!("Failed to parse config at {}", config_path.display()))?;

    tracing::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}

/// Parse config file content
pub fn parse(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Render a configuration as TOML
pub fn render(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config")
}
