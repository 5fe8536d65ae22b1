//! Configuration for the navigation control loop.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{NavError, Result};

/// Run parameters for a navigation attempt.
///
/// All fields have working defaults; a TOML file only needs to name the
/// values it overrides. Unknown fields are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct NavConfig {
    /// Arrival radius used when the target defines none (world units)
    #[serde(default = "default_arrival_radius")]
    pub arrival_radius_default: f64,

    /// Full retries allowed after stuck detection before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Absolute wall-clock ceiling for one navigation call (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,

    /// Window with no progress toward the target before declaring stuck (seconds)
    #[serde(default = "default_stuck_timeout_secs")]
    pub stuck_timeout_secs: f64,

    /// Weight of the newest heading in the exponential heading blend (0..1].
    /// 1.0 disables heading smoothing.
    #[serde(default = "default_smoothing_weight")]
    pub smoothing_weight: f64,

    /// Interval between position samples (milliseconds)
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,

    /// Recent positions kept for smoothing diagnostics
    #[serde(default = "default_history_len")]
    pub history_len: usize,

    /// Consecutive failed position reads tolerated before escalating
    #[serde(default = "default_max_sample_misses")]
    pub max_sample_misses: u32,

    /// Hold an adjacent direction for one tick when retrying after stuck
    #[serde(default = "default_nudge_on_retry")]
    pub nudge_on_retry: bool,
}

// Default value functions
fn default_arrival_radius() -> f64 {
    8.0
}
fn default_max_attempts() -> u32 {
    3
}
fn default_timeout_secs() -> f64 {
    120.0
}
fn default_stuck_timeout_secs() -> f64 {
    10.0
}
fn default_smoothing_weight() -> f64 {
    0.7
}
fn default_sample_interval_ms() -> u64 {
    500
}
fn default_history_len() -> usize {
    4
}
fn default_max_sample_misses() -> u32 {
    5
}
fn default_nudge_on_retry() -> bool {
    true
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            arrival_radius_default: default_arrival_radius(),
            max_attempts: default_max_attempts(),
            timeout_secs: default_timeout_secs(),
            stuck_timeout_secs: default_stuck_timeout_secs(),
            smoothing_weight: default_smoothing_weight(),
            sample_interval_ms: default_sample_interval_ms(),
            history_len: default_history_len(),
            max_sample_misses: default_max_sample_misses(),
            nudge_on_retry: default_nudge_on_retry(),
        }
    }
}

impl NavConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavError::Config(format!("failed to read config file: {}", e)))?;
        let config: NavConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults on a
    /// missing or unreadable file. The fallback is logged, never silent.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("config {:?} unusable ({}), using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Reject parameter combinations the control loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.arrival_radius_default > 0.0) {
            return Err(NavError::Config("arrival_radius_default must be > 0".into()));
        }
        if self.max_attempts == 0 {
            return Err(NavError::Config("max_attempts must be >= 1".into()));
        }
        if !(self.timeout_secs > 0.0) {
            return Err(NavError::Config("timeout_secs must be > 0".into()));
        }
        if !(self.stuck_timeout_secs > 0.0) {
            return Err(NavError::Config("stuck_timeout_secs must be > 0".into()));
        }
        if !(self.smoothing_weight > 0.0 && self.smoothing_weight <= 1.0) {
            return Err(NavError::Config("smoothing_weight must be in (0, 1]".into()));
        }
        if self.sample_interval_ms == 0 {
            return Err(NavError::Config("sample_interval_ms must be > 0".into()));
        }
        if self.history_len == 0 {
            return Err(NavError::Config("history_len must be >= 1".into()));
        }
        if self.max_sample_misses == 0 {
            return Err(NavError::Config("max_sample_misses must be >= 1".into()));
        }
        Ok(())
    }

    /// Wall-clock ceiling as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    /// Stuck window as a `Duration`.
    pub fn stuck_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.stuck_timeout_secs)
    }

    /// Loop pacing interval as a `Duration`.
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}
