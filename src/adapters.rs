//! Config-to-component wiring shared by the subcommands.

use std::path::Path;

use wahlscrape_browser::BrowserManagerConfig;
use wahlscrape_config::{Config, ConfigLoader, TimeoutsConfig};

/// Browser launch settings from the `[browser]` and `[timeouts]` sections.
pub(crate) fn browser_manager_config(config: &Config, work_dir: &Path) -> BrowserManagerConfig {
    let browser = &config.browser;
    BrowserManagerConfig {
        chrome_path: browser.chrome_path.clone(),
        headless: browser.headless,
        disable_images: browser.disable_images,
        profile_root: browser
            .profile_root
            .as_deref()
            .map(|p| ConfigLoader::resolve_path(work_dir, p)),
        extra_args: browser.extra_args.clone(),
        startup_timeout: TimeoutsConfig::ms(config.timeouts.browser_startup_ms),
        page_load_timeout: TimeoutsConfig::ms(config.timeouts.page_load_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_browser_manager_config_from_defaults() {
        let mut config = Config::default();
        config.browser.profile_root = Some(PathBuf::from("profiles"));
        config.browser.headless = false;

        let manager = browser_manager_config(&config, Path::new("/work"));
        assert!(!manager.headless);
        assert!(manager.disable_images);
        assert_eq!(manager.profile_root, Some(PathBuf::from("/work/profiles")));
        assert_eq!(manager.page_load_timeout, Duration::from_secs(20));
        assert_eq!(manager.startup_timeout, Duration::from_secs(15));
    }
}
