//! Configuration for the parsing client

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::consts;
use crate::error::{Error, Result};

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Service base URL, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User agent sent with every request
    #[serde(default = "consts::default_user_agent")]
    pub user_agent: String,
    /// Delay between two status checks in milliseconds (default: 1000)
    #[serde(default = "default_polling_interval_ms")]
    pub polling_interval_ms: u64,
    /// Baseline job duration used for progress estimates (default: 30000)
    #[serde(default = "default_estimated_duration_ms")]
    pub estimated_duration_ms: u64,
    /// Highest progress reported while a job is still pending (default: 95)
    #[serde(default = "default_progress_ceiling")]
    pub progress_ceiling: f64,
}

fn default_base_url() -> String {
    consts::DEFAULT_BASE_URL.to_string()
}
fn default_polling_interval_ms() -> u64 { consts::DEFAULT_POLLING_INTERVAL_MS }
fn default_estimated_duration_ms() -> u64 { consts::DEFAULT_ESTIMATED_DURATION_MS }
fn default_progress_ceiling() -> f64 { consts::DEFAULT_PROGRESS_CEILING }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: consts::default_user_agent(),
            polling_interval_ms: consts::DEFAULT_POLLING_INTERVAL_MS,
            estimated_duration_ms: consts::DEFAULT_ESTIMATED_DURATION_MS,
            progress_ceiling: consts::DEFAULT_PROGRESS_CEILING,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let buf = std::fs::read(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: ClientConfig = serde_json::from_slice(&buf)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the poll loop cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::config("base_url must not be empty"));
        }
        if self.estimated_duration_ms == 0 {
            return Err(Error::config("estimated_duration_ms must be greater than zero"));
        }
        if !(0.0..=100.0).contains(&self.progress_ceiling) {
            return Err(Error::config("progress_ceiling must be within [0, 100]"));
        }
        Ok(())
    }

    /// Polling interval as a duration
    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling_interval_ms)
    }

    /// Estimated job duration as a duration
    pub fn estimated_duration(&self) -> Duration {
        Duration::from_millis(self.estimated_duration_ms)
    }
}
