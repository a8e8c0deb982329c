//! Client configuration loaded from `~/.config/flixscrape/config.toml`.
//!
//! Every field is optional in the file; missing fields take the defaults
//! below. `FLIXSCRAPE_BASE_URL` and `FLIXSCRAPE_USER_AGENT` override the
//! file when set.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Catalog site root.
pub const DEFAULT_BASE_URL: &str = "https://flixhq.to";

/// Desktop Chrome user agent; the site serves a different layout to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// `Accept` header sent with every request.
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Runtime settings for the HTTP client and catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site root without trailing slash.
    pub base_url: String,
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_secs: 10,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load from the default path, then apply environment overrides.
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&config_path())?;
        Ok(config.with_overrides(
            std::env::var("FLIXSCRAPE_BASE_URL").ok(),
            std::env::var("FLIXSCRAPE_USER_AGENT").ok(),
        ))
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        Self::from_toml(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.base_url = normalize_base_url(&config.base_url);
        Ok(config)
    }

    /// Apply overrides; empty values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, base_url: Option<String>, user_agent: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = normalize_base_url(&url);
        }
        if let Some(ua) = user_agent.filter(|u| !u.trim().is_empty()) {
            self.user_agent = ua.trim().to_string();
        }
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flixscrape")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn parse_partial_config() {
        let config = Config::from_toml(
            r#"
base_url = "https://flixhq.test/"
timeout_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://flixhq.test");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(Config::from_toml("timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/flixscrape/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn overrides_replace_non_empty_values() {
        let config = Config::default().with_overrides(
            Some("https://mirror.test//".into()),
            Some("   ".into()),
        );
        assert_eq!(config.base_url, "https://mirror.test");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
