//! Tagged step results.
//!
//! Every workflow step returns [`Step`]: the value on success, otherwise an
//! [`Interrupt`] that is either a terminal classification (recorded once,
//! ends all attempts) or a recoverable fault (consumes an attempt).

use std::fmt;
use std::path::PathBuf;

use wahlscrape_browser::BrowserError;
use wahlscrape_ledger::LedgerTag;

use crate::error::ScrapeError;

/// Outcomes that are classifications rather than errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalReason {
    /// The municipality lies in the excluded region.
    RegionExcluded,
    /// No election table with the year or keyword on the detail page.
    ElectionAbsent,
    /// The results page offers no open-data entry.
    OpenDataMissing,
}

impl TerminalReason {
    pub fn tag(self) -> LedgerTag {
        match self {
            TerminalReason::RegionExcluded => LedgerTag::BayernSkip,
            TerminalReason::ElectionAbsent => LedgerTag::NoBundestagswahl,
            TerminalReason::OpenDataMissing => LedgerTag::NoOpendata,
        }
    }
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminalReason::RegionExcluded => "municipality in excluded region",
            TerminalReason::ElectionAbsent => "election not on record",
            TerminalReason::OpenDataMissing => "no open data available",
        };
        f.write_str(text)
    }
}

/// Why a step did not produce its value.
#[derive(Debug)]
pub enum Interrupt {
    Terminal(TerminalReason),
    Fault(ScrapeError),
}

impl From<ScrapeError> for Interrupt {
    fn from(e: ScrapeError) -> Self {
        Interrupt::Fault(e)
    }
}

impl From<BrowserError> for Interrupt {
    fn from(e: BrowserError) -> Self {
        Interrupt::Fault(ScrapeError::Browser(e))
    }
}

/// Result of one workflow step.
pub type Step<T> = Result<T, Interrupt>;

/// Progress markers of one attempt; a fault is reported against the last
/// state reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeState {
    Init,
    Navigated,
    PageReached,
    RowLocated,
    RegionChecked,
    DetailLoaded,
    ElectionTableChecked,
    ElectionResolved,
    ElectionClicked,
    MoreClicked,
    ResultsPageReached,
    OpenDataClicked,
    LinksExtracted,
    Persisted,
    Success,
}

impl fmt::Display for ScrapeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Final result for one municipality in one run.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    Success {
        name: String,
        links: usize,
        path: PathBuf,
    },
    Terminal(TerminalReason),
    /// Attempt budget used up; the municipality stays unresolved.
    Exhausted { attempts: u32, last_error: String },
}

impl ScrapeOutcome {
    /// Whether the index is resolved for future runs.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ScrapeOutcome::Exhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_tags() {
        assert_eq!(TerminalReason::RegionExcluded.tag(), LedgerTag::BayernSkip);
        assert_eq!(TerminalReason::ElectionAbsent.tag(), LedgerTag::NoBundestagswahl);
        assert_eq!(TerminalReason::OpenDataMissing.tag(), LedgerTag::NoOpendata);
        assert!(TerminalReason::OpenDataMissing.tag().is_terminal());
    }

    #[test]
    fn test_browser_error_is_fault() {
        let interrupt: Interrupt = BrowserError::Timeout("row".to_string()).into();
        assert!(matches!(interrupt, Interrupt::Fault(ScrapeError::Browser(_))));
    }

    #[test]
    fn test_outcome_resolution() {
        assert!(ScrapeOutcome::Terminal(TerminalReason::RegionExcluded).is_resolved());
        assert!(
            !ScrapeOutcome::Exhausted {
                attempts: 2,
                last_error: String::new()
            }
            .is_resolved()
        );
    }
}
