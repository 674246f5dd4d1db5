//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

mod schema_runtime;
mod schema_site;

pub use schema_runtime::*;
pub use schema_site::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub election: ElectionConfig,

    #[serde(default)]
    pub selectors: SelectorsConfig,

    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    #[serde(default)]
    pub scrape: ScrapeConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default = "default_batches")]
    pub batches: Vec<BatchRange>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            election: ElectionConfig::default(),
            selectors: SelectorsConfig::default(),
            timeouts: TimeoutsConfig::default(),
            scrape: ScrapeConfig::default(),
            browser: BrowserConfig::default(),
            output: OutputConfig::default(),
            report: ReportConfig::default(),
            batches: default_batches(),
        }
    }
}

/// A named sub-range of the municipality index space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRange {
    pub name: String,
    pub start: u32,
    pub end: u32,
}

impl BatchRange {
    pub fn new(name: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Number of indices covered (inclusive on both ends).
    pub fn len(&self) -> u32 {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn indices(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}

fn default_batches() -> Vec<BatchRange> {
    vec![
        BatchRange::new("01", 2500, 2600),
        BatchRange::new("02", 2601, 2700),
        BatchRange::new("03", 2701, 2800),
        BatchRange::new("04", 2801, 2900),
        BatchRange::new("05", 2901, 3000),
        BatchRange::new("06", 3001, 3100),
        BatchRange::new("07", 3101, 3175),
    ]
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
