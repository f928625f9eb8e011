use std::path::Path;
use std::time::Duration;
use serde::Deserialize;
use anyhow::{bail, Context, Result};
use shared::protocol::AREAS_PATH;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// e.g. "http://127.0.0.1:5000"
    pub base_url: String,
    #[serde(default = "default_areas_path")]
    pub areas_path: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_label_tick")]
    pub label_tick_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_areas_path() -> String {
    AREAS_PATH.to_string()
}

fn default_request_timeout() -> u64 {
    8
}

fn default_interval() -> u64 {
    10
}

fn default_label_tick() -> u64 {
    1
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            label_tick_secs: default_label_tick(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl BackendConfig {
    pub fn areas_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.areas_path.trim_start_matches('/')
        )
    }
}

/// Timer settings handed to the refresh loop and the freshness label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub interval: Duration,
    pub request_timeout: Duration,
    pub label_tick: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(default_interval()),
            request_timeout: Duration::from_secs(default_request_timeout()),
            label_tick: Duration::from_secs(default_label_tick()),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects zero intervals and keeps a fetch from outliving its refresh tick.
    pub fn validate(&mut self) -> Result<()> {
        if self.refresh.interval_secs == 0 {
            bail!("refresh.interval_secs must be greater than 0");
        }
        if self.refresh.label_tick_secs == 0 {
            bail!("refresh.label_tick_secs must be greater than 0");
        }
        if self.backend.request_timeout_secs == 0 {
            bail!("backend.request_timeout_secs must be greater than 0");
        }
        if self.backend.request_timeout_secs > self.refresh.interval_secs {
            tracing::warn!(
                "backend.request_timeout_secs ({}) exceeds refresh.interval_secs ({}), clamping",
                self.backend.request_timeout_secs,
                self.refresh.interval_secs
            );
            self.backend.request_timeout_secs = self.refresh.interval_secs;
        }
        Ok(())
    }

    pub fn timing(&self) -> Timing {
        Timing {
            interval: Duration::from_secs(self.refresh.interval_secs),
            request_timeout: Duration::from_secs(self.backend.request_timeout_secs),
            label_tick: Duration::from_secs(self.refresh.label_tick_secs),
        }
    }
}
