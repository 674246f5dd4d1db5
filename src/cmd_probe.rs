//! `probe` subcommand: check that a browser session can be started.

use std::path::Path;

use tracing::{error, info};

use wahlscrape_browser::{BrowserManager, CdpSessionFactory, SessionFactory};
use wahlscrape_config::Config;

use crate::adapters::browser_manager_config;

pub(crate) async fn handle_probe_command(
    config: &Config,
    work_dir: &Path,
    url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let manager = BrowserManager::new(browser_manager_config(config, work_dir));
    match manager.chrome_path() {
        Some(path) => info!("Using Chrome at {}", path.display()),
        None => error!("No Chrome executable found"),
    }

    let factory = CdpSessionFactory::new(manager);
    let session = match factory.open().await {
        Ok(session) => session,
        Err(e) => {
            println!("Browser failed to start: {}", e);
            return Err(e.into());
        }
    };
    println!("Browser started. Navigating to {} ...", url);

    let title = match session.goto(url).await {
        Ok(()) => session.title().await,
        Err(e) => Err(e),
    };
    session.close().await;

    let title = title?;
    println!("Title: {}", title);
    println!("Browser closed and profile removed.");
    Ok(())
}
