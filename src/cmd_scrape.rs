//! `scrape` subcommand: pick a batch and run it.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use wahlscrape_browser::{BrowserManager, CdpSessionFactory};
use wahlscrape_config::{BatchRange, Config, ConfigLoader, TimeoutsConfig};
use wahlscrape_core::{BatchDriver, BatchSummary, ScrapeOrchestrator, ScrapeSettings};
use wahlscrape_ledger::{FileLedger, LedgerError};

use crate::adapters::browser_manager_config;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum BatchChoiceError {
    #[error("Please enter a valid number")]
    NotANumber,
    #[error("Invalid batch number")]
    OutOfRange,
}

/// The batch hit `scrape.batch_timeout_secs`; the ledger allows a resume.
#[derive(Debug, Error)]
#[error("Batch {batch} timed out after {secs} seconds; re-run the same batch to resume")]
pub(crate) struct BatchTimedOut {
    pub batch: String,
    pub secs: u64,
}

impl BatchTimedOut {
    /// Exit status distinguishing a timed-out batch from other failures.
    pub(crate) const EXIT_STATUS: u8 = 2;
}

/// Resolve a 1-based batch choice.
pub(crate) fn choose_batch<'a>(
    batches: &'a [BatchRange],
    input: &str,
) -> Result<&'a BatchRange, BatchChoiceError> {
    let choice: i64 = input
        .trim()
        .parse()
        .map_err(|_| BatchChoiceError::NotANumber)?;
    choice
        .checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| batches.get(i))
        .ok_or(BatchChoiceError::OutOfRange)
}

pub(crate) fn batch_menu(batches: &[BatchRange]) -> String {
    let mut menu = String::from("Available batches:\n");
    for (i, batch) in batches.iter().enumerate() {
        menu.push_str(&format!(
            "  {}. Batch {}: {}-{} ({} municipalities)\n",
            i + 1,
            batch.name,
            batch.start,
            batch.end,
            batch.len()
        ));
    }
    menu
}

async fn prompt_choice(batches: &[BatchRange]) -> std::io::Result<String> {
    print!("{}", batch_menu(batches));
    println!("\nEnter batch number to run (1-{}): ", batches.len());

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line)
}

/// Run the `scrape` subcommand.
pub(crate) async fn handle_scrape_command(
    config: &Config,
    work_dir: &Path,
    batch: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = match batch {
        Some(choice) => choice,
        None => prompt_choice(&config.batches).await?,
    };
    let batch = choose_batch(&config.batches, &input)?;

    println!("Starting batch {}: {}-{}", batch.name, batch.start, batch.end);
    println!("Started at: {}", Local::now().format(TIME_FORMAT));

    let settings = Arc::new(ScrapeSettings::from_config(config, work_dir));
    let ledger_path = ConfigLoader::resolve_path(work_dir, &config.output.ledger_path);
    let ledger = Arc::new(FileLedger::new(&ledger_path));
    info!("Ledger: {}", ledger_path.display());
    info!("Result files: {}", settings.data_links_dir.display());

    let manager = BrowserManager::new(browser_manager_config(config, work_dir));
    let factory = Arc::new(CdpSessionFactory::new(manager));
    let orchestrator = Arc::new(ScrapeOrchestrator::new(settings, factory, ledger.clone()));
    let driver = BatchDriver::new(
        orchestrator,
        ledger,
        TimeoutsConfig::ms(config.timeouts.between_municipalities_ms),
    );

    let outcome = run_bounded(
        &batch.name,
        config.scrape.batch_timeout_secs,
        driver.run(batch.indices()),
    )
    .await;

    if let Ok(summary) = &outcome {
        println!(
            "Batch {} completed: {} processed, {} succeeded, {} skipped, {} unresolved ({} already done)",
            batch.name,
            summary.processed,
            summary.succeeded,
            summary.terminal,
            summary.unresolved,
            summary.already_resolved
        );
    }
    println!("Finished at: {}", Local::now().format(TIME_FORMAT));
    outcome.map(|_| ())
}

/// Await the batch, giving up after `limit_secs` when set.
async fn run_bounded<F>(
    batch: &str,
    limit_secs: Option<u64>,
    run: F,
) -> Result<BatchSummary, Box<dyn std::error::Error>>
where
    F: Future<Output = Result<BatchSummary, LedgerError>>,
{
    let Some(secs) = limit_secs else {
        return Ok(run.await?);
    };
    match tokio::time::timeout(Duration::from_secs(secs), run).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            warn!("Batch {} hit the {} s limit", batch, secs);
            Err(BatchTimedOut {
                batch: batch.to_string(),
                secs,
            }
            .into())
        }
    }
}
