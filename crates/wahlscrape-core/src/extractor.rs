//! Link extractor for the open-data page.

use std::sync::OnceLock;

use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;
use wahlscrape_browser::NavigationSession;

use crate::error::ScrapeError;
use crate::outcome::Step;

/// A downloadable link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// Whitespace-normalized anchor text.
    pub text: String,
    /// Absolute address.
    pub url: String,
}

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("valid selector"))
}

/// All anchors whose absolute address ends with `suffix`, in document order.
///
/// Relative addresses are resolved against `base_url`; addresses that cannot
/// be resolved are skipped.
pub fn extract_links(
    html: &str,
    base_url: &str,
    suffix: &str,
) -> Result<Vec<LinkRecord>, ScrapeError> {
    let base = Url::parse(base_url).map_err(|source| ScrapeError::InvalidUrl {
        url: base_url.to_string(),
        source,
    })?;
    let document = Html::parse_document(html);

    let links = document
        .select(anchor_selector())
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let url = match base.join(href.trim()) {
                Ok(url) => url,
                Err(e) => {
                    debug!("Skipping link '{}': {}", href, e);
                    return None;
                }
            };
            if !url.as_str().ends_with(suffix) {
                return None;
            }
            let text = anchor.text().collect::<Vec<_>>().join(" ");
            Some(LinkRecord {
                text: text.split_whitespace().collect::<Vec<_>>().join(" "),
                url: url.into(),
            })
        })
        .collect();

    Ok(links)
}

/// Reads the matching links from the live open-data page.
pub struct LinkExtractor<'a> {
    suffix: &'a str,
}

impl<'a> LinkExtractor<'a> {
    pub fn new(suffix: &'a str) -> Self {
        Self { suffix }
    }

    pub async fn extract(&self, session: &dyn NavigationSession) -> Step<Vec<LinkRecord>> {
        let base_url = session.current_url().await?;
        let html = session.content().await?;
        let links = extract_links(&html, &base_url, self.suffix)?;
        info!("Found {} {} links", links.len(), self.suffix);
        Ok(links)
    }
}
