//! `report` subcommand.

use std::path::Path;

use tracing::info;

use wahlscrape_config::Config;
use wahlscrape_report::{ReportPaths, run_report};

/// Fuzzy matches printed after the summary line.
const MAX_FUZZY_SHOWN: usize = 50;

pub(crate) async fn handle_report_command(
    config: &Config,
    work_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let paths = ReportPaths::from_config(config, work_dir);
    info!("Reference table: {}", paths.municipalities_csv.display());

    let report = run_report(&paths, config.site.page_size, config.report.fuzzy_cutoff).await?;

    println!("Wrote {} rows to {}", report.rows.len(), paths.output_csv.display());
    if !report.fuzzy.is_empty() {
        println!(
            "Note: fuzzy filename matches were used for the following municipalities \
             (number, name, norm, matched_file):"
        );
        for m in report.fuzzy.iter().take(MAX_FUZZY_SHOWN) {
            println!("  {}, {}, {}, {}", m.number, m.name, m.normalized, m.file_name);
        }
    }
    Ok(())
}
