//! # wahlscrape ledger
//!
//! Append-only event log keyed by municipality index. Every scrape attempt
//! leaves `started`/`failed` lines; a terminal tag (`success`, `bayern_skip`,
//! `no_bundestagswahl`, `no_opendata`) marks the index as resolved so later
//! runs skip it.
//!
//! ```text
//! 2501,started,attempt_0
//! 2501,failed,attempt_0,[RowLocated] Timed out waiting for '#ergebnisTabelle ...'
//! 2501,started,attempt_1
//! 2501,success
//! ```

pub mod error;
pub mod event;
pub mod record;
pub mod store;

pub use error::LedgerError;
pub use event::{LedgerEvent, LedgerTag, flatten_detail};
pub use record::{LedgerRecord, parse_ledger};
pub use store::{FileLedger, Ledger, MemoryLedger, resolved_indices};
