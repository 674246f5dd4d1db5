//! # wahlscrape core
//!
//! The per-municipality scrape workflow. A [`BatchDriver`] filters an index
//! range against the resume ledger and hands each remaining index to a
//! [`MunicipalityScraper`]; the [`ScrapeOrchestrator`] implementation walks
//! the listing, resolves the election, follows the page sequence to the
//! open-data page and persists the discovered links.
//!
//! ```text
//! BatchDriver ─► Ledger (read) ─► ScrapeOrchestrator ─► NavigationSession
//!                                   │   MunicipalityLocator
//!                                   │   ElectionResolver
//!                                   │   LinkExtractor ─► <name>_data_links.csv
//!                                   └─► Ledger (append)
//! ```

pub mod batch;
pub mod error;
pub mod extractor;
pub mod index;
pub mod listing;
pub mod orchestrator;
pub mod outcome;
pub mod resolver;
pub mod result_file;
pub mod settings;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{BatchDriver, BatchSummary};
pub use error::ScrapeError;
pub use extractor::{LinkExtractor, LinkRecord, extract_links};
pub use index::MunicipalityIndex;
pub use listing::{MunicipalityLocator, MunicipalityRecord};
pub use orchestrator::{MunicipalityScraper, ScrapeOrchestrator};
pub use outcome::{Interrupt, ScrapeOutcome, ScrapeState, Step, TerminalReason};
pub use resolver::{ElectionCandidate, ElectionCriteria, ElectionResolver, select_election};
pub use result_file::{result_file_name, sanitize_name, write_result_file};
pub use settings::ScrapeSettings;
