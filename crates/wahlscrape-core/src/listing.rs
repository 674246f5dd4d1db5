//! Municipality locator: paginated listing to detail-page address.

use tracing::{debug, info};
use wahlscrape_browser::{Locator, NavigationSession};

use crate::error::ScrapeError;
use crate::index::MunicipalityIndex;
use crate::outcome::{Interrupt, ScrapeState, Step, TerminalReason};
use crate::settings::{ScrapeSettings, pause};

/// A listing entry, read fresh on every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalityRecord {
    pub index: MunicipalityIndex,
    /// Display text of the name link.
    pub name: String,
    pub region: String,
    /// Absolute detail-page address.
    pub detail_url: String,
}

/// Walks the listing to a municipality's row.
pub struct MunicipalityLocator<'a> {
    settings: &'a ScrapeSettings,
}

impl<'a> MunicipalityLocator<'a> {
    pub fn new(settings: &'a ScrapeSettings) -> Self {
        Self { settings }
    }

    /// Run every locator step in sequence, reporting each state reached.
    pub async fn locate(
        &self,
        session: &dyn NavigationSession,
        index: MunicipalityIndex,
        mut reached: impl FnMut(ScrapeState) + Send,
    ) -> Step<MunicipalityRecord> {
        self.open_listing(session).await?;
        reached(ScrapeState::Navigated);
        self.go_to_page(session, index).await?;
        reached(ScrapeState::PageReached);
        let row = self.wait_for_row(session, index).await?;
        reached(ScrapeState::RowLocated);
        let region = self.check_region(session, &row).await?;
        reached(ScrapeState::RegionChecked);
        self.read_entry(session, index, &row, region).await
    }

    /// Load the listing start page.
    async fn open_listing(&self, session: &dyn NavigationSession) -> Step<()> {
        session.goto(&self.settings.site.base_url).await?;
        Ok(())
    }

    /// Click "next" until the index's page is shown.
    async fn go_to_page(
        &self,
        session: &dyn NavigationSession,
        index: MunicipalityIndex,
    ) -> Step<()> {
        let page = index.page(self.settings.site.page_size);
        let timeouts = &self.settings.timeouts;

        for step in 1..page {
            pause(self.settings.wait(timeouts.page_step_pause_ms)).await;
            let used = self.click_next(session).await.ok_or_else(|| {
                ScrapeError::Locator(format!(
                    "Could not click next page button (step {} of {})",
                    step,
                    page - 1
                ))
            })?;
            debug!("Page {} via {}", step + 1, used);
            pause(self.settings.wait(timeouts.after_click_pause_ms)).await;
        }

        if page > 1 {
            info!("Reached listing page {}", page);
        }
        Ok(())
    }

    /// Try each next-page selector in order; returns the one that worked.
    async fn click_next(&self, session: &dyn NavigationSession) -> Option<&'a str> {
        let settings: &'a ScrapeSettings = self.settings;
        let wait = settings.wait(settings.timeouts.next_click_ms);

        for css in &settings.selectors.next_page {
            let locator = Locator::css(css.as_str());
            if let Err(e) = session.wait_clickable(&locator, wait).await {
                debug!("Next selector {} unavailable: {}", css, e);
                continue;
            }
            match session.click(&locator).await {
                Ok(()) => return Some(css.as_str()),
                Err(e) => debug!("Next selector {} click failed: {}", css, e),
            }
        }
        None
    }

    /// Wait for the index's row on the current page.
    async fn wait_for_row(
        &self,
        session: &dyn NavigationSession,
        index: MunicipalityIndex,
    ) -> Step<Locator> {
        let row_number = index.row(self.settings.site.page_size);
        let row = Locator::css(self.settings.selectors.listing_row_for(row_number));

        session
            .wait_present(&row, self.settings.wait(self.settings.timeouts.row_ms))
            .await
            .map_err(|e| {
                ScrapeError::Locator(format!(
                    "Could not find municipality #{} (row {}): {}",
                    index, row_number, e
                ))
            })?;
        Ok(row)
    }

    /// Read the region cell; the excluded region ends the workflow here.
    async fn check_region(&self, session: &dyn NavigationSession, row: &Locator) -> Step<String> {
        let cell = row.within(&self.settings.selectors.region_cell);
        let region = session
            .text(&cell)
            .await
            .map_err(|e| ScrapeError::Locator(format!("Region cell missing: {}", e)))?;
        let region = region.trim().to_string();

        if region == self.settings.site.excluded_region {
            return Err(Interrupt::Terminal(TerminalReason::RegionExcluded));
        }
        Ok(region)
    }

    /// Read name and detail address from the name link.
    async fn read_entry(
        &self,
        session: &dyn NavigationSession,
        index: MunicipalityIndex,
        row: &Locator,
        region: String,
    ) -> Step<MunicipalityRecord> {
        let link = row.within(&self.settings.selectors.name_link);

        let name = session
            .text(&link)
            .await
            .map_err(|e| ScrapeError::Locator(format!("Name link missing: {}", e)))?;
        let detail_url = session
            .href(&link)
            .await
            .map_err(|e| ScrapeError::Locator(format!("Name link missing: {}", e)))?
            .ok_or_else(|| ScrapeError::Locator(format!("Name link of #{} has no address", index)))?;

        let record = MunicipalityRecord {
            index,
            name: name.trim().to_string(),
            region,
            detail_url,
        };
        info!("Found: {} ({})", record.name, record.region);
        Ok(record)
    }
}
