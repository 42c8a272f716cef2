// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding where the gameval document lives.
pub const GAMEVAL_PATH_ENV: &str = "GAMEVAL_PATH";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gameval_path: PathBuf,
    pub keep_alive_timeout_ms: u64,
    pub sweep_interval_ms: u64,
    pub shutdown_grace_ms: u64,
    pub watch_poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gameval_path: PathBuf::from("gamevals.json"),
            keep_alive_timeout_ms: 30 * 1000,
            sweep_interval_ms: 1000,
            shutdown_grace_ms: 5 * 1000,
            watch_poll_interval_ms: 500,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gameval_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.gameval_path = path.into();
        self
    }

    pub fn with_keep_alive_timeout(mut self, timeout: Duration) -> Self {
        self.keep_alive_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace_ms = grace.as_millis() as u64;
        self
    }

    pub fn with_watch_poll_interval(mut self, interval: Duration) -> Self {
        self.watch_poll_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn keep_alive_timeout(&self) -> Duration {
        Duration::from_millis(self.keep_alive_timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    pub fn watch_poll_interval(&self) -> Duration {
        Duration::from_millis(self.watch_poll_interval_ms)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Applies `GAMEVAL_PATH` if it is set and non-empty.
    pub fn apply_env(mut self) -> Self {
        if let Some(path) = std::env::var_os(GAMEVAL_PATH_ENV).filter(|p| !p.is_empty()) {
            self.gameval_path = PathBuf::from(path);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gameval_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation("gameval_path must not be empty".to_string()));
        }
        if self.sweep_interval_ms == 0 {
            return Err(ConfigError::Validation("sweep_interval_ms must be greater than 0".to_string()));
        }
        if self.watch_poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "watch_poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.keep_alive_timeout(), Duration::from_secs(30));
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
        assert_eq!(config.shutdown_grace(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "gameval_path": "data/gamevals.json", "keep_alive_timeout_ms": 100 }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.gameval_path, PathBuf::from("data/gamevals.json"));
        assert_eq!(config.keep_alive_timeout_ms, 100);
        assert_eq!(config.sweep_interval_ms, 1000);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config::new().with_sweep_interval(Duration::from_millis(250));
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap().sweep_interval_ms, 250);
    }

    #[test]
    fn test_validation() {
        let config = Config::new().with_sweep_interval(Duration::ZERO);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        assert!(matches!(Config::load("does/not/exist.json"), Err(ConfigError::NotFound(_))));
    }
}
