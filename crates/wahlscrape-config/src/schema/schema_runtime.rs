//! Timeouts, retry policy, browser and output configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;

/// Bounded waits and pauses, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    #[serde(default = "default_page_load")]
    pub page_load_ms: u64,

    #[serde(default = "default_browser_startup")]
    pub browser_startup_ms: u64,

    /// Per-selector wait for a clickable "next page" affordance.
    #[serde(default = "default_next_click")]
    pub next_click_ms: u64,

    #[serde(default = "default_row")]
    pub row_ms: u64,

    #[serde(default = "default_election_table")]
    pub election_table_ms: u64,

    #[serde(default = "default_ten_seconds")]
    pub url_change_ms: u64,

    #[serde(default = "default_ten_seconds")]
    pub more_link_ms: u64,

    #[serde(default = "default_ten_seconds")]
    pub results_page_ms: u64,

    #[serde(default = "default_dropdown")]
    pub dropdown_ms: u64,

    #[serde(default = "default_ten_seconds")]
    pub open_data_page_ms: u64,

    /// Pause before each "next page" click.
    #[serde(default = "default_page_step_pause")]
    pub page_step_pause_ms: u64,

    /// Pause after a click before the next interaction.
    #[serde(default = "default_after_click_pause")]
    pub after_click_pause_ms: u64,

    /// Pause between scrolling the election link into view and clicking it.
    #[serde(default = "default_scroll_settle")]
    pub scroll_settle_ms: u64,

    /// Pause between municipalities.
    #[serde(default = "default_between_municipalities")]
    pub between_municipalities_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            page_load_ms: default_page_load(),
            browser_startup_ms: default_browser_startup(),
            next_click_ms: default_next_click(),
            row_ms: default_row(),
            election_table_ms: default_election_table(),
            url_change_ms: default_ten_seconds(),
            more_link_ms: default_ten_seconds(),
            results_page_ms: default_ten_seconds(),
            dropdown_ms: default_dropdown(),
            open_data_page_ms: default_ten_seconds(),
            page_step_pause_ms: default_page_step_pause(),
            after_click_pause_ms: default_after_click_pause(),
            scroll_settle_ms: default_scroll_settle(),
            between_municipalities_ms: default_between_municipalities(),
        }
    }
}

impl TimeoutsConfig {
    /// Millisecond setting as a [`Duration`].
    pub fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    /// Every wait and pause set to zero, for tests driving a fake session.
    pub fn immediate() -> Self {
        Self {
            page_load_ms: 0,
            browser_startup_ms: 0,
            next_click_ms: 0,
            row_ms: 0,
            election_table_ms: 0,
            url_change_ms: 0,
            more_link_ms: 0,
            results_page_ms: 0,
            dropdown_ms: 0,
            open_data_page_ms: 0,
            page_step_pause_ms: 0,
            after_click_pause_ms: 0,
            scroll_settle_ms: 0,
            between_municipalities_ms: 0,
        }
    }
}

fn default_page_load() -> u64 {
    20_000
}

fn default_browser_startup() -> u64 {
    15_000
}

fn default_next_click() -> u64 {
    3_000
}

fn default_row() -> u64 {
    5_000
}

fn default_election_table() -> u64 {
    7_000
}

fn default_ten_seconds() -> u64 {
    10_000
}

fn default_dropdown() -> u64 {
    5_000
}

fn default_page_step_pause() -> u64 {
    400
}

fn default_after_click_pause() -> u64 {
    500
}

fn default_scroll_settle() -> u64 {
    1_000
}

fn default_between_municipalities() -> u64 {
    1_000
}

/// Retry policy and run limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Attempts per municipality per run.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Maximum characters of error detail written to the ledger.
    #[serde(default = "default_detail_max_chars")]
    pub detail_max_chars: usize,

    /// Wall-clock limit for one batch; `None` runs until done.
    #[serde(default = "default_batch_timeout")]
    pub batch_timeout_secs: Option<u64>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            detail_max_chars: default_detail_max_chars(),
            batch_timeout_secs: default_batch_timeout(),
        }
    }
}

fn default_max_attempts() -> u32 {
    2
}

fn default_detail_max_chars() -> usize {
    200
}

fn default_batch_timeout() -> Option<u64> {
    Some(4 * 60 * 60)
}

/// Browser launch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Explicit Chrome/Chromium binary; discovered when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_true")]
    pub disable_images: bool,

    /// Parent directory for per-session profile directories (system temp when unset).
    #[serde(default)]
    pub profile_root: Option<PathBuf>,

    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            disable_images: true,
            profile_root: None,
            extra_args: Vec::new(),
        }
    }
}

/// Output locations, relative to the working directory unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    #[serde(default = "default_data_links_dir")]
    pub data_links_dir: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            ledger_path: default_ledger_path(),
            data_links_dir: default_data_links_dir(),
            log_dir: default_log_dir(),
        }
    }
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("scraped_munis.log")
}

fn default_data_links_dir() -> PathBuf {
    PathBuf::from("2021/data_links")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

/// Reconciliation report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Municipality reference table with `Name` and `Page` columns.
    #[serde(default = "default_municipalities_csv")]
    pub municipalities_csv: PathBuf,

    #[serde(default = "default_report_csv")]
    pub output_csv: PathBuf,

    /// Minimum similarity ratio for the last-resort fuzzy match.
    #[serde(default = "default_fuzzy_cutoff")]
    pub fuzzy_cutoff: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            municipalities_csv: default_municipalities_csv(),
            output_csv: default_report_csv(),
            fuzzy_cutoff: default_fuzzy_cutoff(),
        }
    }
}

fn default_municipalities_csv() -> PathBuf {
    PathBuf::from("municipality_names_with_page.csv")
}

fn default_report_csv() -> PathBuf {
    PathBuf::from("2021/summary_stats/munis_check.csv")
}

fn default_fuzzy_cutoff() -> f64 {
    0.78
}
