/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Device defaults
pub const DEFAULT_BASE_URL: &str = "https://192.168.100.1";
pub const DEFAULT_CONNECT_TIMEOUT: &str = "10s";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "30s";

// Poller defaults
pub const DEFAULT_POLL_INTERVAL: &str = "10s";

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 29116;

// Metrics defaults
pub const DEFAULT_EVICT_STALE_SERIES: bool = false;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

// Environment overrides
pub const CREDENTIALS_ENV_VAR: &str = "CREDS";
pub const CONFIG_FILE_ENV_VAR: &str = "CONFIG_FILE";
