//! Ledger errors.

use std::path::PathBuf;

use thiserror::Error;

/// Ledger error types.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// IO error while appending or reading.
    #[error("Ledger IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Event could not be encoded as a single line.
    #[error("Invalid ledger event: {0}")]
    InvalidEvent(String),
}

impl LedgerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
