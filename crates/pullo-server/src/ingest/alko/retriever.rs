//! Price-list retrieval through a headless browser
//!
//! The price-list URL refuses plain HTTP clients, so the file is fetched by
//! driving a real Chrome instance: present realistic headers, point
//! downloads at a scoped per-run directory, navigate, and poll until the
//! file lands on disk.
//!
//! The browser is a blocking client, so the whole fetch runs inside
//! `tokio::task::spawn_blocking`. The closure owns the [`Browser`] value,
//! whose drop terminates the Chrome process; every return path below,
//! including errors, releases it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use headless_chrome::protocol::cdp::Browser::{
    SetDownloadBehavior, SetDownloadBehaviorBehaviorOption,
};
use headless_chrome::{Browser, LaunchOptions, Tab};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::config::AlkoSourceConfig;

/// Poll interval while waiting for the download to land on disk
const DOWNLOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spreadsheet file extensions the download wait accepts
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Failures while driving the browser or waiting on the download
#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Download did not complete within {0:?}")]
    DownloadTimeout(Duration),

    #[error("Browser task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetch the raw price-list bytes for the configured source
pub async fn fetch_price_list(config: &AlkoSourceConfig) -> Result<Vec<u8>, RetrieveError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || fetch_price_list_blocking(&config))
        .await
        .map_err(|e| RetrieveError::Task(e.to_string()))?
}

fn fetch_price_list_blocking(config: &AlkoSourceConfig) -> Result<Vec<u8>, RetrieveError> {
    // Scoped per-run download directory; removed on drop
    let download_dir = match &config.download_dir {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            tempfile::Builder::new().prefix("alko-").tempdir_in(parent)?
        },
        None => tempfile::Builder::new().prefix("alko-").tempdir()?,
    };

    let browser = launch_browser(config)?;

    let tab = browser
        .new_tab()
        .map_err(|e| RetrieveError::Launch(e.to_string()))?;

    prepare_tab(&tab, config, download_dir.path())
        .map_err(|e| RetrieveError::Navigation(e.to_string()))?;

    info!(url = %config.products_url, "Navigating to price-list page");
    match tab.navigate_to(&config.products_url) {
        Ok(_) => {},
        // The download itself aborts the navigation; that is the success
        // path here.
        Err(e) if is_download_interruption(&e) => {
            debug!(error = %e, "Navigation interrupted by download");
        },
        Err(e) => return Err(RetrieveError::Navigation(e.to_string())),
    }

    if let Err(e) = tab.wait_until_navigated() {
        debug!(error = %e, "Navigation did not settle, waiting on the download instead");
    }

    let downloaded = wait_for_download(download_dir.path(), config.download_timeout())?;
    let bytes = std::fs::read(&downloaded)?;

    info!(
        bytes = bytes.len(),
        file = %downloaded.display(),
        "Price list downloaded"
    );

    if let Some(dir) = &config.debug_artifact_dir {
        if let Err(e) = persist_debug_artifacts(dir, &tab, &bytes) {
            warn!(error = %e, "Failed to write debug artifacts");
        }
    }

    Ok(bytes)
}

fn launch_browser(config: &AlkoSourceConfig) -> Result<Browser, RetrieveError> {
    let mut builder = LaunchOptions::default_builder();
    builder
        .headless(true)
        .sandbox(false)
        .idle_browser_timeout(config.idle_browser_timeout());

    if let Some(path) = &config.browser_path {
        builder.path(Some(path.clone()));
    }

    let options = builder
        .build()
        .map_err(|e| RetrieveError::Launch(e.to_string()))?;

    Browser::new(options).map_err(|e| RetrieveError::Launch(e.to_string()))
}

/// Present realistic headers and permit downloads into the scoped directory
fn prepare_tab(
    tab: &Tab,
    config: &AlkoSourceConfig,
    download_dir: &Path,
) -> anyhow::Result<()> {
    tab.set_user_agent(&config.user_agent, Some(&config.accept_language), None)?;

    let headers = HashMap::from([
        ("Referer", config.referer.as_str()),
        ("Origin", config.origin.as_str()),
    ]);
    tab.set_extra_http_headers(headers)?;

    tab.call_method(SetDownloadBehavior {
        behavior: SetDownloadBehaviorBehaviorOption::Allow,
        browser_context_id: None,
        download_path: Some(download_dir.to_string_lossy().into_owned()),
        events_enabled: Some(true),
    })?;

    Ok(())
}

/// Whether a navigation error is the expected interrupted-by-download signal
fn is_download_interruption(error: &anyhow::Error) -> bool {
    error.to_string().contains("ERR_ABORTED")
}

/// Poll the download directory until a spreadsheet file appears.
///
/// Chrome writes `.crdownload` partials and renames them on completion, so a
/// matching extension means the file is whole.
fn wait_for_download(dir: &Path, timeout: Duration) -> Result<PathBuf, RetrieveError> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(path) = find_downloaded_file(dir)? {
            return Ok(path);
        }

        if Instant::now() >= deadline {
            return Err(RetrieveError::DownloadTimeout(timeout));
        }

        std::thread::sleep(DOWNLOAD_POLL_INTERVAL);
    }
}

fn find_downloaded_file(dir: &Path) -> Result<Option<PathBuf>, RetrieveError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        if let Some(ext) = extension {
            if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
                return Ok(Some(path));
            }
        }
    }

    Ok(None)
}

fn persist_debug_artifacts(dir: &Path, tab: &Tab, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join("price-list.xlsx"), bytes)?;

    if let Ok(content) = tab.get_content() {
        std::fs::write(dir.join("page.html"), content)?;
    }

    Ok(())
}
