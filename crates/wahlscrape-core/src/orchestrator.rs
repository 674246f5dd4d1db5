//! Scrape orchestrator.
//!
//! Drives one municipality through the page sequence, one attempt at a time.
//! Each attempt owns a fresh session from the [`SessionFactory`] and is
//! bracketed by ledger events:
//!
//! ```text
//! started,attempt_0 ─► run ─┬─► success | bayern_skip | no_bundestagswahl | no_opendata
//!                           └─► failed,attempt_0,<detail> ─► started,attempt_1 ─► ...
//!                                                              └─► exhausted,attempts_N
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use wahlscrape_browser::{BrowserError, NavigationSession, SessionFactory, UrlCondition};
use wahlscrape_ledger::{Ledger, LedgerEvent, LedgerTag, flatten_detail};

use crate::error::ScrapeError;
use crate::extractor::LinkExtractor;
use crate::index::MunicipalityIndex;
use crate::listing::MunicipalityLocator;
use crate::outcome::{Interrupt, ScrapeOutcome, ScrapeState, Step, TerminalReason};
use crate::resolver::ElectionResolver;
use crate::result_file::write_result_file;
use crate::settings::{ScrapeSettings, locator, pause};

/// Scrapes one municipality to a final outcome.
#[async_trait]
pub trait MunicipalityScraper: Send + Sync {
    async fn scrape(&self, index: MunicipalityIndex) -> ScrapeOutcome;
}

/// Successful attempt result.
struct Scraped {
    name: String,
    links: usize,
    path: PathBuf,
}

/// One attempt over one session.
struct Attempt<'a> {
    settings: &'a ScrapeSettings,
    session: &'a dyn NavigationSession,
    state: ScrapeState,
}

impl<'a> Attempt<'a> {
    fn reach(&mut self, state: ScrapeState) {
        debug!("-> {}", state);
        self.state = state;
    }

    async fn run(&mut self, index: MunicipalityIndex) -> Step<Scraped> {
        let settings = self.settings;
        let session = self.session;
        let timeouts = &settings.timeouts;

        let record = MunicipalityLocator::new(settings)
            .locate(session, index, |state| self.reach(state))
            .await?;
        let candidate = ElectionResolver::new(settings)
            .resolve(session, &record.detail_url, |state| self.reach(state))
            .await?;

        let previous = session.current_url().await?;
        session.scroll_into_view(&candidate.locator).await?;
        pause(settings.wait(timeouts.scroll_settle_ms)).await;
        session.click(&candidate.locator).await?;
        session
            .wait_url(
                &UrlCondition::ChangedFrom(previous),
                settings.wait(timeouts.url_change_ms),
            )
            .await?;
        self.reach(ScrapeState::ElectionClicked);

        let more = locator(&settings.selectors.more_link);
        match session
            .wait_clickable(&more, settings.wait(timeouts.more_link_ms))
            .await
        {
            Ok(()) => {}
            Err(e @ BrowserError::Timeout(_)) => return Err(ScrapeError::MoreLinkMissing(e).into()),
            Err(e) => return Err(e.into()),
        }
        session.scroll_into_view(&more).await?;
        pause(settings.wait(timeouts.scroll_settle_ms)).await;
        session.click(&more).await?;
        self.reach(ScrapeState::MoreClicked);

        session
            .wait_url(
                &UrlCondition::Contains(settings.site.results_url_marker.clone()),
                settings.wait(timeouts.results_page_ms),
            )
            .await?;
        self.reach(ScrapeState::ResultsPageReached);

        self.open_dropdown().await;

        let open_data = locator(&settings.selectors.open_data_link);
        if !session.exists(&open_data).await? {
            return Err(Interrupt::Terminal(TerminalReason::OpenDataMissing));
        }
        session.scroll_into_view(&open_data).await?;
        session.click(&open_data).await?;
        self.reach(ScrapeState::OpenDataClicked);

        session
            .wait_url(
                &UrlCondition::Contains(settings.site.open_data_url_marker.clone()),
                settings.wait(timeouts.open_data_page_ms),
            )
            .await?;
        pause(settings.wait(timeouts.after_click_pause_ms)).await;

        let links = LinkExtractor::new(&settings.site.link_suffix)
            .extract(session)
            .await?;
        self.reach(ScrapeState::LinksExtracted);

        let path = write_result_file(&settings.data_links_dir, &record.name, &links).await?;
        self.reach(ScrapeState::Persisted);

        self.reach(ScrapeState::Success);
        Ok(Scraped {
            name: record.name,
            links: links.len(),
            path,
        })
    }

    /// The "weitere" dropdown only exists on some result pages.
    async fn open_dropdown(&self) {
        let settings = self.settings;
        match self.click_dropdown().await {
            Ok(()) => pause(settings.wait(settings.timeouts.after_click_pause_ms)).await,
            Err(e) => debug!("No dropdown: {}", e),
        }
    }

    async fn click_dropdown(&self) -> Result<(), BrowserError> {
        let dropdown = locator(&self.settings.selectors.further_dropdown);
        self.session
            .wait_clickable(&dropdown, self.settings.wait(self.settings.timeouts.dropdown_ms))
            .await?;
        self.session.click(&dropdown).await
    }
}

/// [`MunicipalityScraper`] over real (or fake) navigation sessions.
pub struct ScrapeOrchestrator {
    settings: Arc<ScrapeSettings>,
    factory: Arc<dyn SessionFactory>,
    ledger: Arc<dyn Ledger>,
}

impl ScrapeOrchestrator {
    pub fn new(
        settings: Arc<ScrapeSettings>,
        factory: Arc<dyn SessionFactory>,
        ledger: Arc<dyn Ledger>,
    ) -> Self {
        Self {
            settings,
            factory,
            ledger,
        }
    }

    /// Ledger failures are logged; the scrape result stands on its own.
    async fn record(&self, event: LedgerEvent) {
        if let Err(e) = self.ledger.append(&event).await {
            error!("Failed to record {} for #{}: {}", event.tag, event.index, e);
        }
    }

    async fn attempt(&self, index: MunicipalityIndex) -> (ScrapeState, Step<Scraped>) {
        let session = match self.factory.open().await {
            Ok(session) => session,
            Err(e) => return (ScrapeState::Init, Err(e.into())),
        };

        let mut attempt = Attempt {
            settings: &self.settings,
            session: &*session,
            state: ScrapeState::Init,
        };
        let result = attempt.run(index).await;
        let state = attempt.state;
        session.close().await;
        (state, result)
    }
}

#[async_trait]
impl MunicipalityScraper for ScrapeOrchestrator {
    async fn scrape(&self, index: MunicipalityIndex) -> ScrapeOutcome {
        let max_attempts = self.settings.scrape.max_attempts;
        let mut last_error = String::new();

        for attempt in 0..max_attempts {
            self.record(LedgerEvent::started(index.get(), attempt)).await;
            info!("#{} attempt {}/{}", index, attempt + 1, max_attempts);

            let (state, result) = self.attempt(index).await;
            match result {
                Ok(scraped) => {
                    self.record(LedgerEvent::terminal(index.get(), LedgerTag::Success))
                        .await;
                    info!("#{} {} done ({} links)", index, scraped.name, scraped.links);
                    return ScrapeOutcome::Success {
                        name: scraped.name,
                        links: scraped.links,
                        path: scraped.path,
                    };
                }
                Err(Interrupt::Terminal(reason)) => {
                    self.record(LedgerEvent::terminal(index.get(), reason.tag()))
                        .await;
                    info!("#{} skipped: {}", index, reason);
                    return ScrapeOutcome::Terminal(reason);
                }
                Err(Interrupt::Fault(e)) => {
                    let detail = flatten_detail(
                        &format!("[{}] {}", state, e),
                        self.settings.scrape.detail_max_chars,
                    );
                    warn!("#{} attempt {} failed: {}", index, attempt, detail);
                    self.record(LedgerEvent::failed(index.get(), attempt, detail.as_str()))
                        .await;
                    last_error = detail;
                }
            }
        }

        self.record(LedgerEvent::exhausted(index.get(), max_attempts))
            .await;
        warn!("#{} unresolved after {} attempts", index, max_attempts);
        ScrapeOutcome::Exhausted {
            attempts: max_attempts,
            last_error,
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
