//! User configuration for tierdesk
//!
//! Settings live in settings.json inside the config directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::Paths;

/// Environment variable overriding the backend base url
pub const BACKEND_URL_ENV: &str = "TIERDESK_BACKEND_URL";

/// User configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    /// Base url of the tier-list backend service
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Per-request timeout for backend calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Treat 404 from admin mutation endpoints as success.
    /// Only meant for backends that have not shipped those endpoints yet.
    #[serde(default)]
    pub soft_not_found_success: bool,

    /// Maximum rows returned by a catalogue search
    #[serde(default = "default_search_page_size")]
    pub search_page_size: usize,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
            soft_not_found_success: false,
            search_page_size: default_search_page_size(),
        }
    }
}

impl UserConfig {
    /// Load configuration from the initialized config dir
    pub fn load() -> Result<Self> {
        let paths = Paths::get()?;
        Self::load_from(&paths.settings_path())
    }

    /// Load configuration from a settings file, creating it with defaults
    pub fn load_from(settings_path: &Path) -> Result<Self> {
        let mut config = if settings_path.exists() {
            let content =
                std::fs::read_to_string(settings_path).context("Failed to read settings file")?;
            serde_json::from_str(&content).context("Failed to parse settings file")?
        } else {
            let config = Self::default();
            config.save_to(settings_path)?;
            config
        };

        config.apply_env();
        Ok(config)
    }

    pub fn save_to(&self, settings_path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(settings_path, content).context("Failed to write settings file")?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                self.backend_url = url.trim().to_string();
            }
        }
    }

    /// Backend url without a trailing slash
    pub fn backend_base(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }
}

// Default value functions for serde

fn default_backend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_search_page_size() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.search_page_size, 50);
        assert!(!config.soft_not_found_success);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: UserConfig =
            serde_json::from_str(r#"{"backendUrl": "http://api.local/"}"#).unwrap();
        assert_eq!(config.backend_url, "http://api.local/");
        assert_eq!(config.backend_base(), "http://api.local");
        assert_eq!(config.search_page_size, 50);
    }

    #[test]
    fn test_load_creates_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");

        let config = UserConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.request_timeout_secs, 30);
    }
}
