use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

pub mod defaults;
pub mod duration_serde;

use defaults::*;
use duration_serde::duration;

use crate::errors::{AppError, AppResult};
use crate::utils::UrlUtils;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Connection settings for the modem's embedded web server
#[derive(Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Pre-encoded credential, sent verbatim in the login URL and the
    /// `Authorization: Basic` header. Overridden by `$CREDS`.
    #[serde(default)]
    pub credentials: String,
    #[serde(default = "default_connect_timeout", with = "duration")]
    pub connect_timeout: Duration,
    #[serde(default = "default_request_timeout", with = "duration")]
    pub request_timeout: Duration,
}

// Hand-written so credentials never end up in logs
impl std::fmt::Debug for DeviceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceConfig")
            .field("base_url", &self.base_url)
            .field("credentials", &if self.credentials.is_empty() { "" } else { "****" })
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Fixed delay between the end of one poll cycle and the start of the next
    #[serde(default = "default_poll_interval", with = "duration")]
    pub interval: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Reset channel gauges before each successful poll so channels that
    /// disappeared from the modem stop being exported
    #[serde(default = "default_evict_stale_series")]
    pub evict_stale_series: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_connect_timeout() -> Duration {
    parse_default_duration(DEFAULT_CONNECT_TIMEOUT)
}

fn default_request_timeout() -> Duration {
    parse_default_duration(DEFAULT_REQUEST_TIMEOUT)
}

fn default_poll_interval() -> Duration {
    parse_default_duration(DEFAULT_POLL_INTERVAL)
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_evict_stale_series() -> bool {
    DEFAULT_EVICT_STALE_SERIES
}

fn parse_default_duration(value: &str) -> Duration {
    humantime::parse_duration(value).unwrap_or(Duration::from_secs(10))
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            credentials: String::new(),
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            evict_stale_series: default_evict_stale_series(),
        }
    }
}

impl Config {
    /// Load from `$CONFIG_FILE`, or `config.toml` when it is unset
    pub fn load() -> Result<Self> {
        let config_file = Self::config_file_path(std::env::var(CONFIG_FILE_ENV_VAR).ok());
        let config = Self::load_from_file(&config_file)?;
        info!("Configuration loaded from: {}", config_file);
        Ok(config)
    }

    pub fn config_file_path(from_env: Option<String>) -> String {
        from_env
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string())
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            Ok(default_config)
        }
    }

    /// Apply environment overrides (currently only `$CREDS`)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(credentials) = std::env::var(CREDENTIALS_ENV_VAR) {
            self.device.credentials = credentials;
        }
    }

    /// Check the settings the exporter cannot run without
    pub fn validate(&self) -> AppResult<()> {
        UrlUtils::parse_base(&self.device.base_url).map_err(|e| {
            AppError::configuration(format!(
                "device.base_url '{}' is not a valid URL: {e}",
                self.device.base_url
            ))
        })?;

        if self.poller.interval.is_zero() {
            return Err(AppError::configuration("poller.interval must be greater than zero"));
        }

        if self.device.credentials.is_empty() {
            warn!(
                "No modem credentials configured; set device.credentials or ${}",
                CREDENTIALS_ENV_VAR
            );
        }

        Ok(())
    }
}
