//! Browser manager type definitions and configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cdp::CdpError;

/// Browser errors surfaced to session users.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Unexpected alert: {0}")]
    UnexpectedDialog(String),

    #[error("Browser not connected")]
    NotConnected,

    #[error("Chrome not found. Please install Google Chrome or set browser.chrome_path.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::Unreachable { .. } | CdpError::Transport(_) => {
                BrowserError::ConnectionFailed(e.to_string())
            }
            CdpError::NavigationFailed { url, reason } => {
                BrowserError::NavigationFailed(format!("{}: {}", url, reason))
            }
            CdpError::Timeout(msg) => BrowserError::Timeout(msg),
            CdpError::DialogOpened(msg) => BrowserError::UnexpectedDialog(msg),
            CdpError::Closed => BrowserError::NotConnected,
            _ => BrowserError::ActionFailed(e.to_string()),
        }
    }
}

/// Launch settings for one isolated browser process.
#[derive(Debug, Clone)]
pub struct BrowserManagerConfig {
    /// Explicit Chrome binary; platform paths are searched when unset.
    pub chrome_path: Option<PathBuf>,
    /// Whether to run Chrome in headless mode.
    pub headless: bool,
    /// Skip image loading.
    pub disable_images: bool,
    /// Parent directory for temporary profiles (system temp when unset).
    pub profile_root: Option<PathBuf>,
    /// Additional command-line switches.
    pub extra_args: Vec<String>,
    /// How long to wait for the DevTools endpoint after spawning.
    pub startup_timeout: Duration,
    /// Upper bound for a page load.
    pub page_load_timeout: Duration,
}

impl Default for BrowserManagerConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            disable_images: true,
            profile_root: None,
            extra_args: Vec::new(),
            startup_timeout: Duration::from_secs(15),
            page_load_timeout: Duration::from_secs(20),
        }
    }
}
