//! Ledger parsing.
//!
//! A line starting with an integer and a comma opens a new record; any other
//! non-blank line continues the free text of the previous record.

use std::sync::OnceLock;

use regex::Regex;

use crate::event::LedgerTag;

/// One parsed ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    pub index: u32,
    /// Everything after `<index>,`, continuation lines joined with a space.
    pub body: String,
}

impl LedgerRecord {
    /// Comma-separated fields of the body, trimmed, empty ones dropped.
    pub fn fields(&self) -> Vec<&str> {
        self.body
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect()
    }

    /// Tag of the record, if the first field is a known tag.
    pub fn tag(&self) -> Option<LedgerTag> {
        self.fields().first().and_then(|f| f.parse().ok())
    }

    pub fn is_terminal(&self) -> bool {
        self.tag().is_some_and(|t| t.is_terminal())
    }
}

fn record_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*,\s*(.*)$").expect("valid regex"))
}

/// Parse ledger text into records in file order.
pub fn parse_ledger(text: &str) -> Vec<LedgerRecord> {
    let mut records: Vec<LedgerRecord> = Vec::new();

    for line in text.lines() {
        if let Some(caps) = record_start().captures(line) {
            if let Ok(index) = caps[1].parse::<u32>() {
                records.push(LedgerRecord {
                    index,
                    body: caps[2].trim().to_string(),
                });
                continue;
            }
        }

        let continuation = line.trim();
        if continuation.is_empty() {
            continue;
        }
        if let Some(last) = records.last_mut() {
            last.body.push(' ');
            last.body.push_str(continuation);
        }
    }

    records
}
