use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::poller::PollTiming;

/// Poll timing parameters (optional `[poll]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Delay between form submission and the first status check, in milliseconds.
    pub initial_delay_ms: u64,
    /// Delay between status checks, in milliseconds.
    pub interval_ms: u64,
    /// Last recorded percentage at or below which an error means "not ready yet".
    pub tolerance_percent: u8,
    /// Give up after this many consecutive not-ready ticks (None = never).
    pub max_not_ready_ticks: Option<u32>,
    /// Give up once this many seconds have passed since submission (None = never).
    pub max_elapsed_secs: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 2000,
            interval_ms: 2000,
            tolerance_percent: 95,
            max_not_ready_ticks: Some(30),
            max_elapsed_secs: None,
        }
    }
}

impl PollConfig {
    pub fn timing(&self) -> PollTiming {
        PollTiming {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            interval: Duration::from_millis(self.interval_ms),
            tolerance_percent: self.tolerance_percent.min(100),
            max_not_ready_ticks: self.max_not_ready_ticks,
            max_elapsed: self.max_elapsed_secs.map(Duration::from_secs),
        }
        .with_interval(Duration::from_millis(self.interval_ms))
    }
}

/// Curl timeouts for the status request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 30,
        }
    }
}

/// Label texts shown by the progress bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Shown right after submission, before the first status arrives.
    pub starting: String,
    /// Shown when the upload is complete (unless overridden per bar).
    pub ready: String,
    /// Shown when polling gives up or the status service misbehaves.
    pub failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            starting: "Starting upload...".to_string(),
            ready: "Finishing upload, stand by....".to_string(),
            failed: "Upload status unavailable".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/upwatch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpwatchConfig {
    /// Base URL of the site that owns the upload-status service.
    pub base_url: String,
    /// Path of the status service below `base_url`.
    #[serde(default = "default_service_path")]
    pub service_path: String,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub messages: Messages,
}

fn default_service_path() -> String {
    "/_services/json/get_upload_info".to_string()
}

impl Default for UpwatchConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4000".to_string(),
            service_path: default_service_path(),
            poll: PollConfig::default(),
            http: HttpConfig::default(),
            messages: Messages::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("upwatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<UpwatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = UpwatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file (no default is written).
pub fn load_from_path(path: &Path) -> Result<UpwatchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: UpwatchConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
