//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means no client-side timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Base URL of the backend API, overridable at build time through
/// `AGENTICA_DEFAULT_API_URL`
pub const DEFAULT_API_URL: &str = match option_env!("AGENTICA_DEFAULT_API_URL") {
    Some(url) => url,
    None => "http://localhost:8000/api",
};

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

/// Where the persisted session lives
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Session file path; defaults to the platform data directory
    #[serde(default)]
    pub store_path: Option<String>,
}

impl SessionConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.store_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(crate::storage::FileStore::default_path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Runs before logging is set up, so files that exist but fail to load
    /// are returned alongside the config for the caller to report.
    pub fn load_default() -> (Self, Vec<ConfigError>) {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("agentica").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];
        let candidates: Vec<PathBuf> = config_paths.into_iter().flatten().collect();
        Self::load_first(&candidates)
    }

    /// First candidate that exists and loads wins; environment only when
    /// none does
    fn load_first(candidates: &[PathBuf]) -> (Self, Vec<ConfigError>) {
        let mut skipped = Vec::new();

        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => return (config, skipped),
                Err(e) => skipped.push(e),
            }
        }

        (Self::from_env(), skipped)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("AGENTICA_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = var("AGENTICA_API_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.api.request_timeout_secs = Some(secs);
            }
        }

        if let Some(path) = var("AGENTICA_SESSION_FILE") {
            self.session.store_path = Some(path);
        }

        if let Some(level) = var("AGENTICA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("AGENTICA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Backend base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# Agentica Client Configuration
#
# Environment variables override these settings:
# - AGENTICA_API_URL
# - AGENTICA_API_TIMEOUT
# - AGENTICA_SESSION_FILE
# - AGENTICA_LOG_LEVEL
# - AGENTICA_LOG_FORMAT

[api]
# Backend API base URL
base_url = "{base_url}"

# Request timeout in seconds (unset: wait for the backend)
# request_timeout_secs = 30

[session]
# Where login credentials are kept between runs
# store_path = "~/.local/share/agentica/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/agentica/client.log"
"#,
        base_url = DEFAULT_API_URL
    )
}
