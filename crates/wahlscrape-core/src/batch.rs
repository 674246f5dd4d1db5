//! Sequential batch driver.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use wahlscrape_ledger::{Ledger, LedgerError, resolved_indices};

use crate::index::MunicipalityIndex;
use crate::orchestrator::MunicipalityScraper;
use crate::outcome::ScrapeOutcome;
use crate::settings::pause;

/// Counts for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub requested: usize,
    /// Already carried a terminal tag before the run.
    pub already_resolved: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub terminal: usize,
    /// Exhausted their attempts; eligible again next run.
    pub unresolved: usize,
}

impl BatchSummary {
    fn count(&mut self, outcome: &ScrapeOutcome) {
        self.processed += 1;
        match outcome {
            ScrapeOutcome::Success { .. } => self.succeeded += 1,
            ScrapeOutcome::Terminal(_) => self.terminal += 1,
            ScrapeOutcome::Exhausted { .. } => self.unresolved += 1,
        }
    }
}

/// Runs the scraper over the unresolved part of an index range, one
/// municipality at a time.
pub struct BatchDriver {
    scraper: Arc<dyn MunicipalityScraper>,
    ledger: Arc<dyn Ledger>,
    pause: Duration,
}

impl BatchDriver {
    pub fn new(
        scraper: Arc<dyn MunicipalityScraper>,
        ledger: Arc<dyn Ledger>,
        pause: Duration,
    ) -> Self {
        Self {
            scraper,
            ledger,
            pause,
        }
    }

    /// Indices of `range` without a terminal ledger tag, ascending.
    pub async fn remaining(
        &self,
        range: RangeInclusive<u32>,
    ) -> Result<Vec<MunicipalityIndex>, LedgerError> {
        let resolved = resolved_indices(self.ledger.as_ref()).await?;
        Ok(range
            .filter(|i| !resolved.contains(i))
            .filter_map(MunicipalityIndex::new)
            .collect())
    }

    pub async fn run(&self, range: RangeInclusive<u32>) -> Result<BatchSummary, LedgerError> {
        let requested = range.clone().count();
        let remaining = self.remaining(range.clone()).await?;

        let mut summary = BatchSummary {
            requested,
            already_resolved: requested - remaining.len(),
            ..Default::default()
        };

        if remaining.is_empty() {
            info!(
                "All municipalities in {}..={} already processed",
                range.start(),
                range.end()
            );
            return Ok(summary);
        }

        info!(
            "{} municipalities to process ({} already done)",
            remaining.len(),
            summary.already_resolved
        );

        let total = remaining.len();
        for (i, index) in remaining.into_iter().enumerate() {
            if i > 0 {
                pause(self.pause).await;
            }
            info!("[{}/{}] Municipality #{}", i + 1, total, index);
            let outcome = self.scraper.scrape(index).await;
            if let ScrapeOutcome::Exhausted { last_error, .. } = &outcome {
                warn!("#{} left unresolved: {}", index, last_error);
            }
            summary.count(&outcome);
        }

        info!(
            "Batch complete: {} processed, {} succeeded, {} skipped, {} unresolved",
            summary.processed, summary.succeeded, summary.terminal, summary.unresolved
        );
        Ok(summary)
    }
}
