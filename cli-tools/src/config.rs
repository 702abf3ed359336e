use admin_ops::LogFilter;
use serde::{Deserialize, Serialize};
use shared::protocol::{
    DEFAULT_API_BASE, DEFAULT_LOG_WINDOW_HOURS, DEFAULT_PROTECTED_EMAIL, DEFAULT_REFRESH_DELAY_MS,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Optional settings from `config.toml`
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct AdminConfig {
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
    pub protected_email: Option<String>,
    pub refresh_delay_ms: Option<u64>,
    pub log_window_hours: Option<u32>,
}

/// Values given on the command line (or through their env vars)
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub server: Option<String>,
    pub timeout_secs: Option<u64>,
    pub protected_email: Option<String>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base: String,
    pub timeout: Option<Duration>,
    pub protected_email: String,
    pub refresh_delay: Duration,
    pub log_window_hours: u32,
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("consult-admin")
        .join("config.toml")
}

pub fn load_config() -> AdminConfig {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> AdminConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                AdminConfig::default()
            }
        },
        Err(_) => AdminConfig::default(),
    }
}

impl Settings {
    /// Command line wins over the config file, which wins over defaults
    pub fn resolve(file: AdminConfig, cli: CliOverrides) -> Self {
        Self {
            api_base: cli
                .server
                .or(file.api_base)
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout: cli
                .timeout_secs
                .or(file.timeout_secs)
                .map(Duration::from_secs),
            protected_email: cli
                .protected_email
                .or(file.protected_email)
                .unwrap_or_else(|| DEFAULT_PROTECTED_EMAIL.to_string()),
            refresh_delay: Duration::from_millis(
                file.refresh_delay_ms.unwrap_or(DEFAULT_REFRESH_DELAY_MS),
            ),
            log_window_hours: file.log_window_hours.unwrap_or(DEFAULT_LOG_WINDOW_HOURS),
        }
    }

    /// Log filter for a dashboard load; `hours` falls back to the configured window
    pub fn log_filter(&self, hours: Option<u32>, status: Option<&str>) -> LogFilter {
        LogFilter::from_parts(hours.unwrap_or(self.log_window_hours), status)
    }
}
