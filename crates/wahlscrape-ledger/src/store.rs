//! Ledger storage.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::error::LedgerError;
use crate::event::LedgerEvent;
use crate::record::{LedgerRecord, parse_ledger};

/// Append-only ledger.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Append one event.
    async fn append(&self, event: &LedgerEvent) -> Result<(), LedgerError>;

    /// All records in append order.
    async fn records(&self) -> Result<Vec<LedgerRecord>, LedgerError>;
}

/// Indices that carry at least one terminal tag.
pub async fn resolved_indices(ledger: &dyn Ledger) -> Result<HashSet<u32>, LedgerError> {
    Ok(ledger
        .records()
        .await?
        .iter()
        .filter(|r| r.is_terminal())
        .map(|r| r.index)
        .collect())
}

/// In-memory ledger for testing.
pub struct MemoryLedger {
    lines: RwLock<Vec<String>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            lines: RwLock::new(Vec::new()),
        }
    }

    /// Ledger pre-populated with raw lines.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: RwLock::new(lines.into_iter().map(Into::into).collect()),
        }
    }

    /// Raw lines written so far.
    pub async fn lines(&self) -> Vec<String> {
        self.lines.read().await.clone()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn append(&self, event: &LedgerEvent) -> Result<(), LedgerError> {
        let line = event.to_line()?;
        self.lines.write().await.push(line);
        Ok(())
    }

    async fn records(&self) -> Result<Vec<LedgerRecord>, LedgerError> {
        let text = self.lines.read().await.join("\n");
        Ok(parse_ledger(&text))
    }
}

/// Ledger backed by a text file.
///
/// The file is opened, appended and closed for every event so a killed
/// process never loses more than the line being written.
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Ledger for FileLedger {
    async fn append(&self, event: &LedgerEvent) -> Result<(), LedgerError> {
        let mut line = event.to_line()?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| LedgerError::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| LedgerError::io(&self.path, e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| LedgerError::io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| LedgerError::io(&self.path, e))?;

        trace!("Ledger append: {}", line.trim_end());
        Ok(())
    }

    async fn records(&self) -> Result<Vec<LedgerRecord>, LedgerError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Ledger {:?} does not exist yet", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(LedgerError::io(&self.path, e)),
        };

        Ok(parse_ledger(&String::from_utf8_lossy(&bytes)))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
