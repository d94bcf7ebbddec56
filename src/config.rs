//! Configuration module for the chat relay server.
//!
//! This module handles loading and validating configuration from TOML files
//! and the process environment.
//!
//! # Configuration Sources (in order of priority)
//! 1. `WEB_HOOK_URL` environment variable (a `.env` file is loaded first)
//! 2. `config.local.toml` - Local overrides (gitignored)
//! 3. `config.toml` - Main configuration file
//! 4. Default values
//!
//! Every section has defaults, so running without any configuration file is
//! supported. Without a usable webhook URL the chat endpoint still answers,
//! but every reply is an error message.
//!
//! # Example
//! ```rust,ignore
//! let config = Config::load("config.toml")?;
//! println!("Server will listen on {}:{}", config.server.host, config.server.port);
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the external automation webhook URL
pub const WEBHOOK_URL_ENV: &str = "WEB_HOOK_URL";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind the API to
    pub host: String,
    /// Port for the API
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Outbound webhook configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookConfig {
    /// Automation endpoint chat messages are relayed to
    #[serde(default)]
    pub url: Option<String>,
}

impl WebhookConfig {
    /// Check if a webhook URL is set
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// Describe why the configured URL cannot be called, if it cannot
    ///
    /// A bad URL does not stop the server: every chat turn reports the
    /// resulting request error instead.
    pub fn url_problem(&self) -> Option<String> {
        let url = self.url.as_deref().filter(|u| !u.is_empty())?;

        match reqwest::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => None,
            Ok(parsed) => Some(format!(
                "webhook url {:?} must use http or https, got {}",
                url,
                parsed.scheme()
            )),
            Err(e) => Some(format!("webhook url {:?} is invalid: {}", url, e)),
        }
    }
}

/// Upload storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory uploaded files are written to, relative to the working directory
    pub upload_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    ///
    /// Environment overrides are applied on top of the file contents.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed or validated
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Loads `.env` if present, then tries:
    /// 1. `config.local.toml` (if exists)
    /// 2. `config.toml` (if exists)
    /// 3. built-in defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        if Path::new("config.local.toml").exists() {
            return Self::load("config.local.toml");
        }

        if Path::new("config.toml").exists() {
            return Self::load("config.toml");
        }

        let mut config = Config::default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from environment-style variables
    ///
    /// `lookup` resolves a variable name to its value; an empty value is
    /// treated as unset.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(WEBHOOK_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.webhook.url = Some(url.trim().to_string());
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.upload_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "upload_dir must not be empty".to_string(),
            ));
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging format must be one of: {:?}",
                valid_formats
            )));
        }

        Ok(())
    }
}
