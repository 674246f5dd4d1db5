//! BrowserManager core: chrome discovery, launch and shutdown.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::{BrowserError, BrowserManagerConfig};
use crate::cdp::{CdpClient, PageSession};

/// File Chrome writes into the profile once remote debugging is listening.
const DEVTOOLS_PORT_FILE: &str = "DevToolsActivePort";

/// Launches isolated Chrome processes.
pub struct BrowserManager {
    config: BrowserManagerConfig,
}

/// A running Chrome process with its profile and an attached page.
pub struct BrowserInstance {
    child: Child,
    profile: TempDir,
    client: CdpClient,
    page: PageSession,
}

impl BrowserManager {
    /// Create a new browser manager.
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BrowserManagerConfig {
        &self.config
    }

    /// Resolve the Chrome binary: configured path first, then platform defaults.
    pub fn chrome_path(&self) -> Option<PathBuf> {
        match &self.config.chrome_path {
            Some(path) if path.exists() => Some(path.clone()),
            Some(path) => {
                warn!("Configured chrome_path does not exist: {}", path.display());
                Self::find_chrome()
            }
            None => Self::find_chrome(),
        }
    }

    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Command-line switches for a session bound to `profile_dir`.
    pub fn chrome_args(config: &BrowserManagerConfig, profile_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "--remote-debugging-port=0".to_string(),
            format!("--user-data-dir={}", profile_dir.display()),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--disable-extensions".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
        ];

        if config.headless {
            args.push("--headless=new".to_string());
        }
        if config.disable_images {
            args.push("--blink-settings=imagesEnabled=false".to_string());
        }

        args.extend(config.extra_args.iter().cloned());
        args.push("about:blank".to_string());
        args
    }

    /// Parse the port from the contents of `DevToolsActivePort`.
    pub fn parse_devtools_port(contents: &str) -> Option<u16> {
        contents
            .lines()
            .next()
            .and_then(|line| line.trim().parse::<u16>().ok())
            .filter(|port| *port != 0)
    }

    fn create_profile(&self) -> Result<TempDir, BrowserError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("wahlscrape-profile-");

        let dir = match &self.config.profile_root {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(|e| {
                    BrowserError::LaunchFailed(format!("profile root {}: {}", root.display(), e))
                })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        };

        dir.map_err(|e| BrowserError::LaunchFailed(format!("profile directory: {}", e)))
    }

    /// Launch Chrome with a fresh profile and attach a page session.
    pub async fn launch(&self) -> Result<BrowserInstance, BrowserError> {
        let chrome_path = self.chrome_path().ok_or(BrowserError::ChromeNotFound)?;
        let profile = self.create_profile()?;

        debug!("Launching Chrome with profile at: {}", profile.path().display());

        let mut child = Command::new(&chrome_path)
            .args(Self::chrome_args(&self.config, profile.path()))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        debug!("Chrome launched with PID: {:?}", child.id());

        match self.attach(&mut child, profile.path()).await {
            Ok((client, page)) => Ok(BrowserInstance {
                child,
                profile,
                client,
                page,
            }),
            Err(e) => {
                let _ = child.kill().await;
                if let Err(rm) = profile.close() {
                    warn!("Failed to remove browser profile: {}", rm);
                }
                Err(e)
            }
        }
    }

    async fn attach(
        &self,
        child: &mut Child,
        profile_dir: &Path,
    ) -> Result<(CdpClient, PageSession), BrowserError> {
        let port = self.wait_for_port(child, profile_dir).await?;
        let endpoint = format!("http://127.0.0.1:{}", port);

        let client = CdpClient::connect(&endpoint).await?;
        let page = client.new_page().await?;

        info!("Browser session ready at {}", endpoint);
        Ok((client, page))
    }

    async fn wait_for_port(&self, child: &mut Child, profile_dir: &Path) -> Result<u16, BrowserError> {
        let port_file = profile_dir.join(DEVTOOLS_PORT_FILE);
        let start = Instant::now();

        loop {
            if let Ok(contents) = tokio::fs::read_to_string(&port_file).await {
                if let Some(port) = Self::parse_devtools_port(&contents) {
                    return Ok(port);
                }
            }

            if let Ok(Some(status)) = child.try_wait() {
                return Err(BrowserError::LaunchFailed(format!(
                    "Chrome exited during startup ({})",
                    status
                )));
            }

            if start.elapsed() > self.config.startup_timeout {
                return Err(BrowserError::LaunchFailed(
                    "Chrome failed to start within timeout".to_string(),
                ));
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

impl BrowserInstance {
    /// The attached page.
    pub fn page(&self) -> &PageSession {
        &self.page
    }

    pub fn profile_dir(&self) -> &Path {
        self.profile.path()
    }

    /// Kill the process and remove the profile directory.
    pub async fn shutdown(self) {
        let BrowserInstance {
            mut child,
            profile,
            client,
            page,
        } = self;

        drop(page);
        drop(client);

        if let Err(e) = child.kill().await {
            warn!("Failed to kill Chrome: {}", e);
        }

        let path = profile.path().to_path_buf();
        match profile.close() {
            Ok(()) => debug!("Removed browser profile {}", path.display()),
            Err(e) => warn!("Failed to remove browser profile {}: {}", path.display(), e),
        }
    }
}
