//! Election resolver: picks the target election on a municipality page.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};
use wahlscrape_browser::{BrowserError, Locator, NavigationSession};

use crate::error::ScrapeError;
use crate::outcome::{Interrupt, ScrapeState, Step, TerminalReason};
use crate::settings::ScrapeSettings;

/// Which election to pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionCriteria {
    /// Substring of the year cell.
    pub year: String,
    /// Substring of the label cell, compared case-insensitively.
    pub keyword: String,
}

impl ElectionCriteria {
    pub fn matches(&self, year_text: &str, label_text: &str) -> bool {
        year_text.contains(self.year.as_str())
            && label_text
                .to_lowercase()
                .contains(&self.keyword.to_lowercase())
    }
}

/// The selected election row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionCandidate {
    pub year_text: String,
    pub label_text: String,
    /// Raw `href` of the label link, if it has one.
    pub target_link: Option<String>,
    /// Addresses the label link in the live page.
    pub locator: Locator,
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn anchor_selector() -> &'static Selector {
    static SELECTOR: std::sync::OnceLock<Selector> = std::sync::OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a").expect("valid selector"))
}

/// Pick the first row (document order) whose year and label match and whose
/// label cell holds a link.
///
/// Rows with fewer than two direct `td` cells are ignored. The returned
/// locator is `<rows> > td:nth-of-type(2) a` at the position of the chosen
/// link among all elements that selector matches.
pub fn select_election(
    html: &str,
    rows_css: &str,
    criteria: &ElectionCriteria,
) -> Result<Option<ElectionCandidate>, ScrapeError> {
    let rows_selector =
        Selector::parse(rows_css).map_err(|_| ScrapeError::InvalidSelector(rows_css.to_string()))?;
    let link_css = format!("{} > td:nth-of-type(2) a", rows_css);
    let link_selector =
        Selector::parse(&link_css).map_err(|_| ScrapeError::InvalidSelector(link_css.clone()))?;

    let document = Html::parse_document(html);

    for row in document.select(&rows_selector) {
        let cells: Vec<ElementRef<'_>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "td")
            .collect();
        if cells.len() < 2 {
            continue;
        }

        let year_text = cell_text(&cells[0]);
        let label_text = cell_text(&cells[1]);
        if !criteria.matches(&year_text, &label_text) {
            continue;
        }

        let Some(link) = cells[1].select(anchor_selector()).next() else {
            debug!("Row '{}' / '{}' matches but has no link", year_text, label_text);
            continue;
        };

        let Some(nth) = document
            .select(&link_selector)
            .position(|candidate| candidate.id() == link.id())
        else {
            continue;
        };

        return Ok(Some(ElectionCandidate {
            year_text,
            label_text,
            target_link: link.value().attr("href").map(str::to_string),
            locator: Locator::css(link_css).nth(nth),
        }));
    }

    Ok(None)
}

/// Loads the detail page and resolves the election link.
pub struct ElectionResolver<'a> {
    settings: &'a ScrapeSettings,
}

impl<'a> ElectionResolver<'a> {
    pub fn new(settings: &'a ScrapeSettings) -> Self {
        Self { settings }
    }

    pub fn criteria(&self) -> ElectionCriteria {
        ElectionCriteria {
            year: self.settings.election.year.clone(),
            keyword: self.settings.election.keyword.clone(),
        }
    }

    /// Run every resolver step in sequence, reporting each state reached.
    pub async fn resolve(
        &self,
        session: &dyn NavigationSession,
        detail_url: &str,
        mut reached: impl FnMut(ScrapeState) + Send,
    ) -> Step<ElectionCandidate> {
        self.open_detail(session, detail_url).await?;
        reached(ScrapeState::DetailLoaded);
        self.check_table(session).await?;
        reached(ScrapeState::ElectionTableChecked);
        let candidate = self.select(session).await?;
        reached(ScrapeState::ElectionResolved);
        Ok(candidate)
    }

    async fn open_detail(&self, session: &dyn NavigationSession, detail_url: &str) -> Step<()> {
        session.goto(detail_url).await?;
        Ok(())
    }

    /// Wait for any cell mentioning the keyword or the year.
    ///
    /// Nothing within the wait means the election is not on record.
    async fn check_table(&self, session: &dyn NavigationSession) -> Step<()> {
        let election = &self.settings.election;
        let cell = &self.settings.selectors.election_cell;
        let probes = [
            Locator::css(cell.as_str())
                .containing(election.keyword.as_str())
                .ignoring_case(),
            Locator::css(cell.as_str()).containing(election.year.as_str()),
        ];

        let wait = self.settings.wait(self.settings.timeouts.election_table_ms);
        match session.wait_any_present(&probes, wait).await {
            Ok(_) => Ok(()),
            Err(BrowserError::Timeout(_)) => {
                info!("No {} {} election found", election.year, election.keyword);
                Err(Interrupt::Terminal(TerminalReason::ElectionAbsent))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Pick the matching row from the current page.
    async fn select(&self, session: &dyn NavigationSession) -> Step<ElectionCandidate> {
        let html = session.content().await?;
        let criteria = self.criteria();

        let candidate = select_election(&html, &self.settings.selectors.election_rows, &criteria)?
            .ok_or_else(|| {
                ScrapeError::Resolver(format!(
                    "No {} {} link found",
                    criteria.year, criteria.keyword
                ))
            })?;

        info!("Found: '{}' ({})", candidate.label_text, candidate.year_text);
        Ok(candidate)
    }
}
