//! Configuration management for myvax_fetcher
//!
//! Configuration is layered: built-in defaults, then a TOML file (explicit
//! `--config` path or the first file found in the standard locations), then
//! environment variables. A `.env` file in the working directory is loaded
//! into the environment by `main` before this runs.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ClientConfig, DatasetKind, FeedCatalog};
use crate::constants::{self, feeds, http, limits};
use crate::errors::{ConfigError, ConfigResult, Result};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Upstream feed locations
    pub feeds: FeedsConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Whole-request timeout (e.g. "30s")
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout (e.g. "10s")
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Connection pool idle timeout (None = no timeout)
    #[serde(with = "humantime_serde")]
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// User agent sent upstream
    pub user_agent: String,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            user_agent: http::USER_AGENT.to_string(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

/// TOML-friendly feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfigToml {
    /// Base URL every dataset path is joined onto
    pub base_url: String,
    /// Per-dataset path overrides, keyed by snake-case dataset name
    pub paths: HashMap<DatasetKind, String>,
}

impl Default for FeedsConfigToml {
    fn default() -> Self {
        Self {
            base_url: feeds::BASE_URL.to_string(),
            paths: HashMap::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. Environment variables
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_file_override {
            Some(path) if path.exists() => Some(path),
            Some(path) => return Err(ConfigError::NotFound { path }.into()),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(|name| env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![
            PathBuf::from(".").join(constants::config::LOCAL_FILE),
            PathBuf::from(".").join(constants::config::FILE_NAME),
        ];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }
        #[cfg(unix)]
        search_paths.push(
            PathBuf::from("/etc")
                .join(constants::config::APP_DIR)
                .join(constants::config::FILE_NAME),
        );

        let found = search_paths.into_iter().find(|path| path.exists());
        if let Some(path) = &found {
            debug!("Found config file: {}", path.display());
        }
        found
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(constants::config::APP_DIR)
                .join(constants::config::FILE_NAME)
        })
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(constants::env::FEED_BASE_URL) {
            debug!(
                "Feed base URL overridden by {}",
                constants::env::FEED_BASE_URL
            );
            self.feeds.base_url = base_url;
        }
    }

    /// Reject values that would only fail later at request time
    pub fn validate(&self) -> ConfigResult<()> {
        if self.client.rate_limit_rps == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.rate_limit_rps".to_string(),
                value: "0".to_string(),
                reason: "Rate limit must be greater than 0".to_string(),
            });
        }

        if let Err(e) = url::Url::parse(&self.feeds.base_url) {
            return Err(ConfigError::InvalidValue {
                field: "feeds.base_url".to_string(),
                value: self.feeds.base_url.clone(),
                reason: e.to_string(),
            });
        }

        if let Err(e) = self.logging.level.parse::<tracing::Level>() {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: e.to_string(),
            });
        }

        Ok(())
    }

    /// Log level used when no verbosity flag is given
    pub fn default_log_level(&self) -> tracing::Level {
        self.logging
            .level
            .parse()
            .unwrap_or(tracing::Level::WARN)
    }

    /// Runtime HTTP client configuration
    pub fn client_config(&self) -> ClientConfig {
        self.client.to_runtime_config()
    }

    /// Feed catalog with base URL and path overrides applied
    pub fn feed_catalog(&self) -> Result<FeedCatalog> {
        let catalog = self
            .feeds
            .paths
            .iter()
            .fold(FeedCatalog::new(&self.feeds.base_url)?, |catalog, (kind, path)| {
                catalog.with_path(*kind, path.clone())
            });
        Ok(catalog)
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
            pool_idle_timeout: self.pool_idle_timeout,
            pool_max_per_host: self.pool_max_per_host,
            user_agent: self.user_agent.clone(),
            rate_limit_rps: self.rate_limit_rps,
        }
    }
}
