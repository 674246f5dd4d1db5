//! Scripted in-memory site and [`NavigationSession`] fake.
//!
//! Pages are static HTML keyed by URL. Locators are resolved with `scraper`,
//! clicking an anchor follows its `href`, and an element carrying
//! `data-alert="..."` raises a dialog that the next operation reports.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use scraper::{Html, Selector};
use url::Url;
use wahlscrape_browser::{
    BrowserError, Locator, NavigationSession, SessionFactory, UrlCondition, poll_until,
};

/// Static pages by URL.
#[derive(Debug, Default, Clone)]
pub struct FakeSite {
    pages: HashMap<String, String>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }
}

/// What the fake found for a locator.
struct Found {
    text: String,
    href: Option<String>,
    alert: Option<String>,
    clickable: bool,
}

fn find(html: &str, locator: &Locator) -> Result<Option<Found>, BrowserError> {
    let selector = Selector::parse(&locator.css)
        .map_err(|_| BrowserError::ActionFailed(format!("bad selector {}", locator.css)))?;
    let document = Html::parse_document(html);

    let found = document
        .select(&selector)
        .filter(|el| {
            let text = el.text().collect::<String>();
            locator.text_matches(&text)
        })
        .nth(locator.nth)
        .map(|el| Found {
            text: el.text().collect::<String>().trim().to_string(),
            href: el.value().attr("href").map(str::to_string),
            alert: el.value().attr("data-alert").map(str::to_string),
            clickable: el.value().attr("hidden").is_none()
                && el.value().attr("disabled").is_none(),
        });

    Ok(found)
}

/// Session over a [`FakeSite`]. Every operation is appended to a shared log.
pub struct FakeSession {
    site: Arc<FakeSite>,
    current: Mutex<Option<String>>,
    pending_alert: Mutex<Option<String>>,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakeSession {
    pub fn new(site: Arc<FakeSite>, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            site,
            current: Mutex::new(None),
            pending_alert: Mutex::new(None),
            log,
        }
    }

    fn record(&self, entry: String) {
        self.log.lock().push(entry);
    }

    fn check_alert(&self) -> Result<(), BrowserError> {
        match self.pending_alert.lock().take() {
            Some(message) => Err(BrowserError::UnexpectedDialog(message)),
            None => Ok(()),
        }
    }

    fn current_html(&self) -> Result<(String, String), BrowserError> {
        let url = self.current.lock().clone().ok_or(BrowserError::NotConnected)?;
        let html = self
            .site
            .pages
            .get(&url)
            .cloned()
            .ok_or_else(|| BrowserError::NavigationFailed(url.clone()))?;
        Ok((url, html))
    }

    fn lookup(&self, locator: &Locator) -> Result<Option<Found>, BrowserError> {
        self.check_alert()?;
        let (_, html) = self.current_html()?;
        find(&html, locator)
    }

    fn require(&self, locator: &Locator) -> Result<Found, BrowserError> {
        self.lookup(locator)?
            .ok_or_else(|| BrowserError::ElementNotFound(locator.to_string()))
    }

    fn load(&self, url: &str) -> Result<(), BrowserError> {
        if !self.site.pages.contains_key(url) {
            return Err(BrowserError::NavigationFailed(format!("{}: ERR_NAME_NOT_RESOLVED", url)));
        }
        *self.current.lock() = Some(url.to_string());
        Ok(())
    }
}

#[async_trait]
impl NavigationSession for FakeSession {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.record(format!("goto {}", url));
        self.load(url)
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        self.check_alert()?;
        Ok(self.current.lock().clone().unwrap_or_default())
    }

    async fn title(&self) -> Result<String, BrowserError> {
        let found = self.lookup(&Locator::css("title"))?;
        Ok(found.map(|f| f.text).unwrap_or_default())
    }

    async fn wait_any_present(
        &self,
        locators: &[Locator],
        timeout: Duration,
    ) -> Result<usize, BrowserError> {
        let what = locators.iter().map(Locator::to_string).collect::<Vec<_>>().join(" or ");
        self.record(format!("wait {}", what));
        poll_until(timeout, what, move || async move {
            for (i, locator) in locators.iter().enumerate() {
                if self.lookup(locator)?.is_some() {
                    return Ok(Some(i));
                }
            }
            Ok(None)
        })
        .await
    }

    async fn wait_clickable(&self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError> {
        self.record(format!("wait_clickable {}", locator));
        poll_until(timeout, format!("{} to be clickable", locator), move || async move {
            Ok(self.lookup(locator)?.filter(|f| f.clickable).map(|_| ()))
        })
        .await
    }

    async fn wait_url(
        &self,
        condition: &UrlCondition,
        timeout: Duration,
    ) -> Result<String, BrowserError> {
        poll_until(timeout, condition, move || async move {
            let url = self.current_url().await?;
            Ok(condition.matches(&url).then_some(url))
        })
        .await
    }

    async fn exists(&self, locator: &Locator) -> Result<bool, BrowserError> {
        self.record(format!("exists {}", locator));
        Ok(self.lookup(locator)?.is_some())
    }

    async fn text(&self, locator: &Locator) -> Result<String, BrowserError> {
        self.record(format!("text {}", locator));
        Ok(self.require(locator)?.text)
    }

    async fn href(&self, locator: &Locator) -> Result<Option<String>, BrowserError> {
        self.record(format!("href {}", locator));
        let found = self.require(locator)?;
        let (url, _) = self.current_html()?;
        Ok(found.href.map(|h| match Url::parse(&url).and_then(|base| base.join(&h)) {
            Ok(absolute) => absolute.to_string(),
            Err(_) => h,
        }))
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), BrowserError> {
        self.require(locator).map(|_| ())
    }

    async fn click(&self, locator: &Locator) -> Result<(), BrowserError> {
        self.record(format!("click {}", locator));
        let found = self.require(locator)?;

        if let Some(message) = found.alert {
            *self.pending_alert.lock() = Some(message);
            return Ok(());
        }

        if let Some(href) = found.href {
            let (url, _) = self.current_html()?;
            let target = Url::parse(&url)
                .and_then(|base| base.join(&href))
                .map_err(|e| BrowserError::ActionFailed(e.to_string()))?;
            // Unknown targets leave the page unchanged, like a dead link.
            let _ = self.load(target.as_str());
        }
        Ok(())
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.check_alert()?;
        Ok(self.current_html()?.1)
    }

    async fn close(&self) {
        self.record("close".to_string());
        *self.current.lock() = None;
    }
}

/// Factory handing out [`FakeSession`]s; can refuse the first `fail_opens` opens.
pub struct FakeFactory {
    site: Arc<FakeSite>,
    pub log: Arc<Mutex<Vec<String>>>,
    opened: AtomicU32,
    fail_opens: u32,
}

impl FakeFactory {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            log: Arc::new(Mutex::new(Vec::new())),
            opened: AtomicU32::new(0),
            fail_opens: 0,
        }
    }

    pub fn failing_first(mut self, fail_opens: u32) -> Self {
        self.fail_opens = fail_opens;
        self
    }

    pub fn opened(&self) -> u32 {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    /// Fresh session over the same site, for driving components directly.
    pub fn session(&self) -> FakeSession {
        FakeSession::new(self.site.clone(), self.log.clone())
    }
}

#[async_trait]
impl SessionFactory for FakeFactory {
    async fn open(&self) -> Result<Box<dyn NavigationSession>, BrowserError> {
        let n = self.opened.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push("open".to_string());
        if n < self.fail_opens {
            return Err(BrowserError::LaunchFailed("Chrome exited during startup".to_string()));
        }
        Ok(Box::new(self.session()))
    }
}

// ============================================================================
// Canned votemanager-like pages
// ============================================================================

pub const START: &str = "https://wahlen.example/";
pub const PAGE_2: &str = "https://wahlen.example/?page=2";

/// Listing page with `(name, region, href)` rows and an optional next link.
pub fn listing_page(rows: &[(&str, &str, &str)], next: Option<&str>) -> String {
    let body: String = rows
        .iter()
        .map(|(name, region, href)| {
            format!(
                "<tr><td><a href=\"{href}\">{name}</a></td><td>Kreis</td><td>{region}</td></tr>"
            )
        })
        .collect();
    let next = next
        .map(|href| format!("<div id=\"ergebnisTabelle_next\"><a href=\"{href}\">weiter</a></div>"))
        .unwrap_or_default();
    format!(
        "<html><head><title>votemanager</title></head><body>\
         <table id=\"ergebnisTabelle\"><tbody>{body}</tbody></table>{next}</body></html>"
    )
}

/// Detail page listing `(year, label, href)` elections; empty `href` means no link.
pub fn detail_page(rows: &[(&str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(year, label, href)| {
            let label = if href.is_empty() {
                label.to_string()
            } else {
                format!("<a href=\"{href}\">{label}</a>")
            };
            format!("<tr><td>{year}</td><td>{label}</td></tr>")
        })
        .collect();
    format!("<html><body><div><table><tbody>{body}</tbody></table></div></body></html>")
}

pub fn election_page(more_href: &str) -> String {
    format!("<html><body><a href=\"{more_href}\">mehr ...</a></body></html>")
}

pub fn results_page(open_data_href: Option<&str>) -> String {
    let item = open_data_href
        .map(|href| format!("<a class=\"dropdown-item\" href=\"{href}\">Open Data</a>"))
        .unwrap_or_default();
    format!(
        "<html><body><a class=\"dropdown-toggle\" href=\"#\">weitere</a>\
         <div class=\"dropdown-menu\">{item}</div></body></html>"
    )
}

pub fn open_data_page(links: &[(&str, &str)]) -> String {
    let body: String = links
        .iter()
        .map(|(text, href)| format!("<li><a href=\"{href}\"> {text} </a></li>"))
        .collect();
    format!("<html><body><ul>{body}</ul></body></html>")
}

/// A complete happy-path site for municipality #13 (page 2, row 3).
pub fn happy_site() -> FakeSite {
    FakeSite::new()
        .page(
            START,
            listing_page(&[("Aach", "Baden-Württemberg", "/aach/")], Some("?page=2")),
        )
        .page(
            PAGE_2,
            listing_page(
                &[
                    ("Aalen", "Baden-Württemberg", "/aalen/"),
                    ("Abenberg", "Bayern", "/abenberg/"),
                    ("Bad Kreuznach", "Rheinland-Pfalz", "/bad-kreuznach/"),
                ],
                None,
            ),
        )
        .page(
            "https://wahlen.example/bad-kreuznach/",
            detail_page(&[
                ("2020", "Bundestagswahl", "/bad-kreuznach/2020/"),
                ("2021", "Landtagswahl", "/bad-kreuznach/ltw/"),
                ("2021", "Bundestagswahl 2021", "/bad-kreuznach/btw/"),
            ]),
        )
        .page(
            "https://wahlen.example/bad-kreuznach/btw/",
            election_page("/bad-kreuznach/btw/ergebnis.html"),
        )
        .page(
            "https://wahlen.example/bad-kreuznach/btw/ergebnis.html",
            results_page(Some("/bad-kreuznach/btw/opendata.html")),
        )
        .page(
            "https://wahlen.example/bad-kreuznach/btw/opendata.html",
            open_data_page(&[
                ("Wahlbezirke", "open_data_wahlbezirke.csv"),
                ("Lizenz", "lizenz.pdf"),
                ("Gemeinde", "https://cdn.example/gemeinde.csv"),
                ("Briefwahl", "/bad-kreuznach/btw/brief.csv"),
            ]),
        )
}

/// Settings pointing at the canned site, with every wait set to zero.
pub fn settings(data_links_dir: &std::path::Path) -> crate::settings::ScrapeSettings {
    let mut config = wahlscrape_config::Config::default();
    config.site.base_url = START.to_string();
    config.timeouts = wahlscrape_config::TimeoutsConfig::immediate();
    config.output.data_links_dir = data_links_dir.to_path_buf();
    crate::settings::ScrapeSettings::from_config(&config, data_links_dir)
}
