//! Ledger events and their line encoding.

use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Event tag written after the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerTag {
    Started,
    Success,
    BayernSkip,
    NoBundestagswahl,
    NoOpendata,
    Failed,
    /// Attempt budget used up in this run; informational only.
    Exhausted,
}

impl LedgerTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerTag::Started => "started",
            LedgerTag::Success => "success",
            LedgerTag::BayernSkip => "bayern_skip",
            LedgerTag::NoBundestagswahl => "no_bundestagswahl",
            LedgerTag::NoOpendata => "no_opendata",
            LedgerTag::Failed => "failed",
            LedgerTag::Exhausted => "exhausted",
        }
    }

    /// Whether the tag resolves the index for future runs.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LedgerTag::Success
                | LedgerTag::BayernSkip
                | LedgerTag::NoBundestagswahl
                | LedgerTag::NoOpendata
        )
    }
}

impl fmt::Display for LedgerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerTag {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "started" => Ok(LedgerTag::Started),
            "success" => Ok(LedgerTag::Success),
            "bayern_skip" => Ok(LedgerTag::BayernSkip),
            "no_bundestagswahl" => Ok(LedgerTag::NoBundestagswahl),
            "no_opendata" => Ok(LedgerTag::NoOpendata),
            "failed" => Ok(LedgerTag::Failed),
            "exhausted" => Ok(LedgerTag::Exhausted),
            other => Err(LedgerError::InvalidEvent(format!("unknown tag '{}'", other))),
        }
    }
}

/// One ledger line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEvent {
    pub index: u32,
    pub tag: LedgerTag,
    /// Zero-based attempt number for `started`/`failed`, attempts used for `exhausted`.
    pub attempt: Option<u32>,
    pub detail: Option<String>,
}

impl LedgerEvent {
    pub fn started(index: u32, attempt: u32) -> Self {
        Self {
            index,
            tag: LedgerTag::Started,
            attempt: Some(attempt),
            detail: None,
        }
    }

    pub fn failed(index: u32, attempt: u32, detail: impl Into<String>) -> Self {
        Self {
            index,
            tag: LedgerTag::Failed,
            attempt: Some(attempt),
            detail: Some(detail.into()),
        }
    }

    pub fn exhausted(index: u32, attempts: u32) -> Self {
        Self {
            index,
            tag: LedgerTag::Exhausted,
            attempt: Some(attempts),
            detail: None,
        }
    }

    /// A terminal event (`success`, `bayern_skip`, ...).
    pub fn terminal(index: u32, tag: LedgerTag) -> Self {
        Self {
            index,
            tag,
            attempt: None,
            detail: None,
        }
    }

    /// Encode as a ledger line without the trailing newline.
    pub fn to_line(&self) -> Result<String, LedgerError> {
        let mut line = format!("{},{}", self.index, self.tag);

        if let Some(attempt) = self.attempt {
            match self.tag {
                LedgerTag::Exhausted => line.push_str(&format!(",attempts_{}", attempt)),
                _ => line.push_str(&format!(",attempt_{}", attempt)),
            }
        }

        if let Some(detail) = &self.detail {
            if detail.contains(['\n', '\r']) {
                return Err(LedgerError::InvalidEvent(format!(
                    "detail for index {} spans multiple lines",
                    self.index
                )));
            }
            line.push(',');
            line.push_str(detail);
        }

        Ok(line)
    }
}

/// Collapse whitespace (line breaks included) to single spaces and cut to `max_chars`.
pub fn flatten_detail(detail: &str, max_chars: usize) -> String {
    let flat = detail.split_whitespace().collect::<Vec<_>>().join(" ");
    flat.chars().take(max_chars).collect()
}
