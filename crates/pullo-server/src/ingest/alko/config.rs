//! Alko data source configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the Alko price-list source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlkoSourceConfig {
    /// URL of the price-list page. Navigating here triggers the file
    /// download.
    pub products_url: String,
    /// User agent presented to the publisher
    pub user_agent: String,
    /// Accept-Language header value
    pub accept_language: String,
    /// Referer header value
    pub referer: String,
    /// Origin header value
    pub origin: String,
    /// Explicit browser executable. When unset, the system default Chrome
    /// installation is used.
    pub browser_path: Option<PathBuf>,
    /// Parent directory for per-run download directories. Defaults to the
    /// system temp directory.
    pub download_dir: Option<PathBuf>,
    /// Overall download timeout in seconds
    pub download_timeout_secs: u64,
    /// Idle browser timeout in seconds
    pub idle_browser_timeout_secs: u64,
    /// When set, the downloaded file and page HTML are copied here for
    /// diagnosis.
    pub debug_artifact_dir: Option<PathBuf>,
}

impl Default for AlkoSourceConfig {
    fn default() -> Self {
        Self {
            products_url: String::new(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            accept_language: "fi-FI,en;q=0.9".to_string(),
            referer: "https://www.alko.fi/".to_string(),
            origin: "https://www.alko.fi".to_string(),
            browser_path: None,
            download_dir: None,
            download_timeout_secs: 120,
            idle_browser_timeout_secs: 90,
            debug_artifact_dir: None,
        }
    }
}

impl AlkoSourceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `ALKO_PRODUCTS_URL`: price-list page URL (required for ingestion)
    /// - `ALKO_USER_AGENT`: override the presented user agent
    /// - `ALKO_BROWSER_PATH`: explicit Chrome executable path
    /// - `ALKO_DOWNLOAD_DIR`: parent directory for download directories
    /// - `ALKO_DOWNLOAD_TIMEOUT_SECS`: overall download timeout
    /// - `ALKO_DEBUG_DIR`: directory for debug artifacts
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("ALKO_PRODUCTS_URL") {
            config.products_url = url;
        }

        if let Ok(agent) = std::env::var("ALKO_USER_AGENT") {
            config.user_agent = agent;
        }

        if let Ok(path) = std::env::var("ALKO_BROWSER_PATH") {
            config.browser_path = Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("ALKO_DOWNLOAD_DIR") {
            config.download_dir = Some(PathBuf::from(dir));
        }

        if let Ok(secs) = std::env::var("ALKO_DOWNLOAD_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.download_timeout_secs = secs;
            }
        }

        if let Ok(dir) = std::env::var("ALKO_DEBUG_DIR") {
            config.debug_artifact_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Set the price-list URL
    pub fn with_products_url(mut self, url: impl Into<String>) -> Self {
        self.products_url = url.into();
        self
    }

    /// Set the browser executable path
    pub fn with_browser_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.browser_path = Some(path.into());
        self
    }

    /// Set the download timeout
    pub fn with_download_timeout(mut self, timeout_secs: u64) -> Self {
        self.download_timeout_secs = timeout_secs;
        self
    }

    /// Set the debug artifact directory
    pub fn with_debug_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_artifact_dir = Some(dir.into());
        self
    }

    /// Overall download timeout
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Idle browser timeout
    pub fn idle_browser_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_browser_timeout_secs)
    }

    /// Validate the configuration for an ingestion run
    pub fn validate(&self) -> Result<(), String> {
        if self.products_url.is_empty() {
            return Err("ALKO_PRODUCTS_URL is not defined".to_string());
        }
        if self.download_timeout_secs == 0 {
            return Err("Download timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
