use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backoff parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// First wait after a retryable HTTP status (503), in seconds. Doubles per failure.
    pub http_initial_secs: u64,
    /// Ceiling for the retryable HTTP wait, in seconds.
    pub http_max_secs: u64,
    /// First wait after a rate-limit status (420), in seconds. Doubles per failure, no ceiling.
    pub rate_limit_initial_secs: u64,
    /// Transport waits start at this many milliseconds and grow by it per failure.
    pub transport_step_ms: u64,
    /// Ceiling for the transport wait, in milliseconds.
    pub transport_max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            http_initial_secs: 5,
            http_max_secs: 320,
            rate_limit_initial_secs: 60,
            transport_step_ms: 250,
            transport_max_ms: 16_000,
        }
    }
}

/// Streaming endpoints. The filter endpoint is used whenever keywords are given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub sample_url: String,
    pub filter_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            sample_url: "https://stream.twitter.com/1.1/statuses/sample.json".to_string(),
            filter_url: "https://stream.twitter.com/1.1/statuses/filter.json".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/slurp/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlurpConfig {
    /// User-Agent sent with every connection attempt.
    pub user_agent: String,
    /// Upper bound on TCP/TLS connect time for one attempt.
    pub connect_timeout_secs: u64,
    /// Seconds without payload bytes before a connected stream is considered stalled.
    pub idle_timeout_secs: u64,
    #[serde(default)]
    pub endpoints: EndpointConfig,
    /// Optional backoff policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub backoff: Option<BackoffConfig>,
}

impl Default for SlurpConfig {
    fn default() -> Self {
        Self {
            user_agent: "slurp/0.1".to_string(),
            connect_timeout_secs: 30,
            idle_timeout_secs: 90,
            endpoints: EndpointConfig::default(),
            backoff: None,
        }
    }
}

impl SlurpConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn backoff(&self) -> BackoffConfig {
        self.backoff.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("slurp")
        .map_err(|e| ConfigError::ConfigFile(format!("no config directory: {}", e)))?;
    xdg_dirs
        .place_config_file("config.toml")
        .map_err(|e| ConfigError::ConfigFile(format!("cannot create config directory: {}", e)))
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SlurpConfig, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SlurpConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)
            .map_err(|e| ConfigError::ConfigFile(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::ConfigFile(format!("{}: {}", parent.display(), e)))?;
        }
        fs::write(&path, toml)
            .map_err(|e| ConfigError::ConfigFile(format!("{}: {}", path.display(), e)))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path. The file must exist.
pub fn load_from(path: &Path) -> Result<SlurpConfig, ConfigError> {
    let data = fs::read_to_string(path)
        .map_err(|e| ConfigError::ConfigFile(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&data).map_err(|e| ConfigError::ConfigFile(format!("{}: {}", path.display(), e)))
}
