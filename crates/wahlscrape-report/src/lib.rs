//! # wahlscrape report
//!
//! Cross-checks the municipality reference table against the result files
//! and the resume ledger, producing `munis_check.csv`:
//!
//! ```text
//! number,municipality,data_links,log_attempt,log_result
//! 2501,Aach,1,started;attempt_0,success
//! 2502,Abenberg,0,started;attempt_0,bayern_skip
//! ```
//!
//! Result files are matched by normalized name, falling back to substring
//! and similarity matching for names that were written differently.

pub mod error;
pub mod log_summary;
pub mod matcher;
pub mod normalize;
pub mod reference;
pub mod report;
pub mod similarity;

pub use error::ReportError;
pub use log_summary::{LogSummary, group_entries, summarize_entries};
pub use matcher::{DataLinksIndex, LinkMatch, MatchKind};
pub use normalize::{clean_field, fold_to_ascii, normalize_name};
pub use reference::{NumberedMunicipality, ReferenceRow, load_reference, number_rows};
pub use report::{FuzzyMatch, Reconciliation, ReportPaths, ReportRow, reconcile, run_report, write_report};
pub use similarity::{close_match, ratio};
