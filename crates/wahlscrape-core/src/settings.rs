//! Runtime settings shared by the workflow components.

use std::path::{Path, PathBuf};
use std::time::Duration;

use wahlscrape_browser::Locator;
use wahlscrape_config::{
    Config, ConfigLoader, ElectionConfig, ElementSelector, ScrapeConfig, SelectorsConfig,
    SiteConfig, TimeoutsConfig,
};

/// The parts of [`Config`] the scrape workflow reads, with paths resolved.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub site: SiteConfig,
    pub election: ElectionConfig,
    pub selectors: SelectorsConfig,
    pub timeouts: TimeoutsConfig,
    pub scrape: ScrapeConfig,
    /// Directory receiving `<name>_data_links.csv` files.
    pub data_links_dir: PathBuf,
}

impl ScrapeSettings {
    pub fn from_config(config: &Config, work_dir: &Path) -> Self {
        Self {
            site: config.site.clone(),
            election: config.election.clone(),
            selectors: config.selectors.clone(),
            timeouts: config.timeouts.clone(),
            scrape: config.scrape.clone(),
            data_links_dir: ConfigLoader::resolve_path(work_dir, &config.output.data_links_dir),
        }
    }

    /// Convert a millisecond setting.
    pub fn wait(&self, ms: u64) -> Duration {
        TimeoutsConfig::ms(ms)
    }
}

/// Live-page locator for a configured selector.
pub(crate) fn locator(selector: &ElementSelector) -> Locator {
    let locator = Locator::css(selector.css.as_str());
    match &selector.text {
        Some(text) if selector.ignore_case => locator.containing(text.as_str()).ignoring_case(),
        Some(text) => locator.containing(text.as_str()),
        None => locator,
    }
}

/// Sleep unless the pause is zero.
pub(crate) async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
