use crate::utils::normalize_url;
use directories::BaseDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://songbird-api.onrender.com";
pub const DEFAULT_WHATSAPP_NUMBER: &str = "15551234567";
pub const API_URL_ENV: &str = "SONGBIRD_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_url: String,
    pub whatsapp_number: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("songbird.toml"))
    }

    /// Settings file plus the `SONGBIRD_API_URL` override. Never fails;
    /// anything unreadable falls back to defaults.
    pub fn load() -> Self {
        Self::from_file().with_api_override(std::env::var(API_URL_ENV).ok())
    }

    /// What the settings file alone says, without environment overrides.
    pub fn from_file() -> Self {
        Self::config_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    pub fn with_api_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self.normalized()
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match toml::from_str::<Settings>(&text) {
                Ok(settings) => settings.normalized(),
                Err(err) => {
                    warn!("failed to parse {}: {err}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                info!("settings {} not read ({err}); using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Writes a starter file with the built-in defaults when none exists.
    /// Returns whether a file was written.
    pub fn write_defaults_if_missing(path: &Path) -> std::io::Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        fs::write(path, text)
    }

    fn normalized(mut self) -> Self {
        self.api_url = if self.api_url.trim().is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            normalize_url(&self.api_url).trim_end_matches('/').to_string()
        };
        self
    }
}
