//! Recoverable scrape faults.

use std::path::PathBuf;

use thiserror::Error;
use wahlscrape_browser::BrowserError;

/// A fault that consumes an attempt.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Pagination, row or name-link lookup failed.
    #[error("{0}")]
    Locator(String),

    /// The election table exists but has no matching row with a link.
    #[error("{0}")]
    Resolver(String),

    /// The "mehr" affordance never became clickable.
    #[error("'mehr' link not found: {0}")]
    MoreLinkMissing(BrowserError),

    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to write {path}: {message}")]
    Persist { path: PathBuf, message: String },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}
