use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::DEFAULT_FEED_CAPACITY;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 2_000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Environment variable overriding `api_url`.
pub const API_URL_ENV: &str = "DEBUGFLOW_API_URL";
/// Older name for [`API_URL_ENV`], still honored.
pub const LEGACY_API_URL_ENV: &str = "VITE_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: Option<String>,
    pub feed_capacity: usize,
    pub submit_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// Endpoint given on the command line. Never written to disk.
    #[serde(skip)]
    pub endpoint_override: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            feed_capacity: DEFAULT_FEED_CAPACITY,
            submit_delay_ms: DEFAULT_SUBMIT_DELAY_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            endpoint_override: None,
        }
    }
}

impl AppConfig {
    /// Backend base URL: command line, environment, config file, then the local default.
    pub fn api_url(&self) -> String {
        self.endpoint_override
            .clone()
            .or_else(env_api_url)
            .or_else(|| self.api_url.clone().filter(|url| !url.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn env_api_url() -> Option<String> {
    [API_URL_ENV, LEGACY_API_URL_ENV]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

pub fn load_config() -> AppConfig {
    let path = config_path();
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return AppConfig::default();
    };
    match toml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Ignoring malformed config {}: {}", path.display(), err);
            AppConfig::default()
        }
    }
}

pub fn save_config(config: &AppConfig) -> anyhow::Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("DEBUGFLOW_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    app_data_dir().join("config.toml")
}

fn app_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("DEBUGFLOW_DATA_HOME") {
        return PathBuf::from(path);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = home::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("DebugFlow");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("DebugFlow");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("debugflow");
        }
        if let Some(home) = home::home_dir() {
            return home.join(".local").join("share").join("debugflow");
        }
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".debugflow")
}
