//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the service base URL, the last used username and the
//! display name entered at sign-up.
//!
//! Configuration is stored at `~/.config/corkboard/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "corkboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the service base URL
pub const BASE_URL_ENV: &str = "CORKBOARD_BASE_URL";

/// Board service used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://front-mission.bigs.or.kr";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub last_username: Option<String>,
    /// Name entered at sign-up, kept until that account first signs in
    pub pending_display_name: Option<PendingDisplayName>,
}

/// Display name chosen at sign-up for one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingDisplayName {
    pub username: String,
    pub name: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Base URL of the board service: environment, then config, then default
    pub fn base_url(&self) -> String {
        Self::resolve_base_url(std::env::var(BASE_URL_ENV).ok(), self.base_url.as_deref())
    }

    fn resolve_base_url(env: Option<String>, configured: Option<&str>) -> String {
        env.filter(|v| !v.trim().is_empty())
            .or_else(|| configured.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn remember_sign_up_name(&mut self, username: &str, name: &str) {
        self.pending_display_name = Some(PendingDisplayName {
            username: username.trim().to_string(),
            name: name.trim().to_string(),
        });
    }

    /// Sign-up name for `username`, if that account signed up here and has
    /// not signed in since
    pub fn name_hint_for(&self, username: &str) -> Option<&str> {
        self.pending_display_name
            .as_ref()
            .filter(|p| p.username.eq_ignore_ascii_case(username.trim()))
            .map(|p| p.name.as_str())
    }

    pub fn forget_sign_up_name(&mut self) {
        self.pending_display_name = None;
    }

    /// Directory holding the persisted session slot
    pub fn session_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
