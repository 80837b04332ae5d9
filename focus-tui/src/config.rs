use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const API_URL_ENV: &str = "FOCUS_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Base URL of the task API, e.g. "https://to-dolist-back-end.onrender.com/api"
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// How often the timer window's liveness is checked while a session runs.
    #[serde(default = "default_liveness_poll_ms")]
    pub liveness_poll_ms: u64,

    /// Seconds between alerts while a countdown is running.
    #[serde(default = "default_alert_interval_secs")]
    pub alert_interval_secs: u64,

    /// Countdown length used when the timer location carries no usable duration.
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,

    /// Background session history refresh period.
    #[serde(default = "default_history_refresh_secs")]
    pub history_refresh_secs: u64,
}

fn default_api_url() -> String {
    "https://to-dolist-back-end.onrender.com/api".to_string()
}

fn default_liveness_poll_ms() -> u64 {
    500
}

fn default_alert_interval_secs() -> u64 {
    30
}

fn default_duration_minutes() -> u32 {
    5
}

fn default_history_refresh_secs() -> u64 {
    60
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            liveness_poll_ms: default_liveness_poll_ms(),
            alert_interval_secs: default_alert_interval_secs(),
            default_duration_minutes: default_duration_minutes(),
            history_refresh_secs: default_history_refresh_secs(),
        }
    }
}

impl FocusConfig {
    fn root_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("focus-tui"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::root_path()?.join("config.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::root_path()?.join("focus-tui.log"))
    }

    /// Load config from disk. Returns default config if file doesn't exist.
    /// `FOCUS_API_URL` overrides the file's `api_url`.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            Self::parse(&raw)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }

    pub fn liveness_poll_interval(&self) -> Duration {
        Duration::from_millis(self.liveness_poll_ms.max(50))
    }

    pub fn alert_interval(&self) -> Duration {
        Duration::from_secs(self.alert_interval_secs.max(1))
    }

    pub fn history_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.history_refresh_secs.max(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config = FocusConfig::parse(r#"api_url = "http://localhost:3000/api""#).unwrap();
        assert_eq!(config.api_url, "http://localhost:3000/api");
        assert_eq!(config.liveness_poll_ms, 500);
        assert_eq!(config.alert_interval_secs, 30);
        assert_eq!(config.default_duration_minutes, 5);
    }

    #[test]
    fn intervals_are_bounded_below() {
        let config = FocusConfig {
            liveness_poll_ms: 0,
            alert_interval_secs: 0,
            ..FocusConfig::default()
        };
        assert_eq!(config.liveness_poll_interval(), Duration::from_millis(50));
        assert_eq!(config.alert_interval(), Duration::from_secs(1));
    }
}
