//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the data directory, the simulated sign-in latency, and the
//! last email used to sign in.
//!
//! Configuration is stored at `~/.config/careercompass/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config/data directory paths
const APP_NAME: &str = "careercompass";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Overrides `latency_ms` when set
pub const LATENCY_ENV: &str = "CAREERCOMPASS_LATENCY_MS";

/// Pre-fills the email field of login forms when set
pub const EMAIL_ENV: &str = "CAREERCOMPASS_EMAIL";

fn default_latency_ms() -> u64 {
    careercompass_core::auth::DEFAULT_LATENCY.as_millis() as u64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the session slot and logs live. Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    #[serde(default)]
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            latency_ms: default_latency_ms(),
            last_email: None,
        }
    }
}

impl Config {
    /// Load the config, falling back to defaults when it is missing or broken.
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                warn!(error = %e, "Failed to locate config, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn load_or_default_from(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents).context("Failed to parse config file")
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Sign-in latency, honoring the environment override.
    pub fn latency(&self) -> Duration {
        let ms = std::env::var(LATENCY_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(self.latency_ms);
        Duration::from_millis(ms)
    }

    /// Email to pre-fill on login forms.
    pub fn prefill_email(&self) -> Option<String> {
        std::env::var(EMAIL_ENV)
            .ok()
            .filter(|e| !e.is_empty())
            .or_else(|| self.last_email.clone())
    }
}
