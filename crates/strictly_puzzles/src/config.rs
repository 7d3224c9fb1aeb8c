//! Server configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Idle time after which a session is evicted, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 120;

/// Period of the background sweep, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30;

/// Largest `N` accepted at session creation.
pub const DEFAULT_MAX_PUZZLE_SIZE: u32 = 10_000;

/// Configuration for the simulator server.
///
/// Every field is optional in the file and falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Seconds a session may sit idle before eviction.
    #[serde(default = "default_session_ttl_secs")]
    session_ttl_secs: u64,

    /// Seconds between background sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    sweep_interval_secs: u64,

    /// Largest accepted disk or entity count.
    #[serde(default = "default_max_puzzle_size")]
    max_puzzle_size: u32,
}

fn default_session_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_sweep_interval_secs() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECS
}

fn default_max_puzzle_size() -> u32 {
    DEFAULT_MAX_PUZZLE_SIZE
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: DEFAULT_TTL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            max_puzzle_size: DEFAULT_MAX_PUZZLE_SIZE,
        }
    }
}

impl SimulatorConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(
            ttl_secs = config.session_ttl_secs,
            sweep_interval_secs = config.sweep_interval_secs,
            max_puzzle_size = config.max_puzzle_size,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::from_file(path),
            Some(path) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Overrides the session TTL.
    pub fn with_session_ttl_secs(mut self, secs: u64) -> Self {
        self.session_ttl_secs = secs;
        self
    }

    /// Overrides the sweep interval.
    pub fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.sweep_interval_secs = secs;
        self
    }

    /// Overrides the maximum puzzle size.
    pub fn with_max_puzzle_size(mut self, size: u32) -> Self {
        self.max_puzzle_size = size;
        self
    }

    /// Session TTL as a duration.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Sweep interval as a duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_ttl_secs == 0 {
            return Err(ConfigError::new("session_ttl_secs must be positive".to_string()));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::new(
                "sweep_interval_secs must be positive".to_string(),
            ));
        }
        if self.max_puzzle_size == 0 {
            return Err(ConfigError::new("max_puzzle_size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "session_ttl_secs = 5").unwrap();

        let config = SimulatorConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.session_ttl_secs(), 5);
        assert_eq!(*config.sweep_interval_secs(), DEFAULT_SWEEP_INTERVAL_SECS);
        assert_eq!(*config.max_puzzle_size(), DEFAULT_MAX_PUZZLE_SIZE);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimulatorConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, SimulatorConfig::default());
    }

    #[test]
    fn test_rejects_zero_ttl_and_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "session_ttl_secs = 0").unwrap();
        assert!(SimulatorConfig::from_file(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ttl = 5").unwrap();
        let err = SimulatorConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("parse"));
    }
}
