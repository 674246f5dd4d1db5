//! Per-municipality result files.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::error::ScrapeError;
use crate::extractor::LinkRecord;

/// File-name-safe form of a municipality name.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

pub fn result_file_name(name: &str) -> String {
    format!("{}_data_links.csv", sanitize_name(name))
}

fn encode(links: &[LinkRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(["text", "url"])?;
    for link in links {
        writer.write_record([link.text.as_str(), link.url.as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Write (or overwrite) the result file for `name` under `dir`.
pub async fn write_result_file(
    dir: &Path,
    name: &str,
    links: &[LinkRecord],
) -> Result<PathBuf, ScrapeError> {
    let path = dir.join(result_file_name(name));
    let persist = |message: String| ScrapeError::Persist {
        path: path.clone(),
        message,
    };

    fs::create_dir_all(dir)
        .await
        .map_err(|e| persist(e.to_string()))?;
    let bytes = encode(links).map_err(|e| persist(e.to_string()))?;
    fs::write(&path, bytes)
        .await
        .map_err(|e| persist(e.to_string()))?;

    info!("Saved {} links to {}", links.len(), path.display());
    Ok(path)
}
