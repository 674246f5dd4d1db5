//! Reconciliation report assembly and output.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;
use wahlscrape_config::{Config, ConfigLoader};
use wahlscrape_ledger::{FileLedger, Ledger, LedgerRecord};

use crate::error::ReportError;
use crate::log_summary::{group_entries, summarize_entries};
use crate::matcher::{DataLinksIndex, MatchKind};
use crate::normalize::{clean_field, normalize_name};
use crate::reference::{NumberedMunicipality, load_reference, number_rows};

/// One line of `munis_check.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub number: i64,
    pub municipality: String,
    /// 1 when a result file was found.
    pub data_links: u8,
    pub log_attempt: String,
    pub log_result: String,
}

/// A result file matched by something other than its exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub number: i64,
    pub name: String,
    pub normalized: String,
    pub file_name: String,
}

#[derive(Debug, Default)]
pub struct Reconciliation {
    pub rows: Vec<ReportRow>,
    pub fuzzy: Vec<FuzzyMatch>,
}

/// Input and output locations, resolved against the work directory.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub municipalities_csv: PathBuf,
    pub data_links_dir: PathBuf,
    pub ledger: PathBuf,
    pub output_csv: PathBuf,
}

impl ReportPaths {
    pub fn from_config(config: &Config, work_dir: &Path) -> Self {
        let resolve = |p: &Path| ConfigLoader::resolve_path(work_dir, p);
        Self {
            municipalities_csv: resolve(&config.report.municipalities_csv),
            data_links_dir: resolve(&config.output.data_links_dir),
            ledger: resolve(&config.output.ledger_path),
            output_csv: resolve(&config.report.output_csv),
        }
    }
}

/// Join reference rows with result files and ledger entries.
pub fn reconcile(
    municipalities: &[NumberedMunicipality],
    files: &DataLinksIndex,
    records: &[LedgerRecord],
) -> Reconciliation {
    let entries = group_entries(records);
    let mut report = Reconciliation::default();

    for municipality in municipalities {
        let found = files.lookup(&municipality.name);
        if let Some(m) = found.as_ref().filter(|m| m.kind != MatchKind::Exact) {
            report.fuzzy.push(FuzzyMatch {
                number: municipality.number,
                name: municipality.name.clone(),
                normalized: normalize_name(&municipality.name),
                file_name: m.file_name.clone(),
            });
        }

        let summary = u32::try_from(municipality.number)
            .ok()
            .and_then(|n| entries.get(&n))
            .map(|e| summarize_entries(e))
            .unwrap_or_default();

        report.rows.push(ReportRow {
            number: municipality.number,
            municipality: clean_field(&municipality.name),
            data_links: u8::from(found.is_some()),
            log_attempt: clean_field(&summary.attempt),
            log_result: clean_field(&summary.result),
        });
    }

    report
}

pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| ReportError::csv(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| ReportError::csv(path, e))?;
    }
    writer.flush().map_err(|e| ReportError::io(path, e))?;
    Ok(())
}

/// Build and write the report; returns what was written.
pub async fn run_report(
    paths: &ReportPaths,
    page_size: u32,
    cutoff: f64,
) -> Result<Reconciliation, ReportError> {
    let reference = load_reference(&paths.municipalities_csv)?;
    let municipalities = number_rows(&reference, page_size);
    let files = DataLinksIndex::from_dir(&paths.data_links_dir, cutoff)?;
    let records = FileLedger::new(&paths.ledger).records().await?;
    info!(
        "Reconciling {} municipalities against {} result files and {} ledger entries",
        municipalities.len(),
        files.len(),
        records.len()
    );

    let report = reconcile(&municipalities, &files, &records);
    write_report(&paths.output_csv, &report.rows)?;
    info!("Wrote {} rows to {:?}", report.rows.len(), paths.output_csv);
    Ok(report)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
