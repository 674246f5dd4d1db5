//! wahlscrape - resumable scraper for municipal election open-data links
//!
//! Main entry point for the wahlscrape CLI.

mod adapters;
mod cli;
mod cmd_probe;
mod cmd_report;
mod cmd_scrape;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wahlscrape_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};
use crate::cmd_probe::handle_probe_command;
use crate::cmd_report::handle_report_command;
use crate::cmd_scrape::{BatchTimedOut, handle_scrape_command};

/// Initialize tracing with console and file output.
///
/// Log files are written to `log_dir` with daily rotation.
fn init_tracing(log_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("wahlscrape")
        .filename_suffix("log")
        .max_log_files(30)
        .build(log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer when dropped; keep it for the process lifetime.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load the configuration; a missing file means defaults.
fn load_config(path: &Path, work_dir: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let path = ConfigLoader::resolve_path(work_dir, path);
    let config = ConfigLoader::load_or_default(&path)?;

    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    for warning in &warnings {
        eprintln!("Config warning: {}: {}", warning.path, warning.message);
    }
    Ok(config)
}

async fn run(cli: Cli, work_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli.config, &work_dir)?;
    init_tracing(&ConfigLoader::resolve_path(&work_dir, &config.output.log_dir))?;

    info!("Starting wahlscrape v{}", env!("CARGO_PKG_VERSION"));
    info!("Working directory: {}", work_dir.display());

    match cli.command {
        None => handle_scrape_command(&config, &work_dir, None).await,
        Some(Commands::Scrape { batch }) => handle_scrape_command(&config, &work_dir, batch).await,
        Some(Commands::Report) => handle_report_command(&config, &work_dir).await,
        Some(Commands::Probe { url }) => handle_probe_command(&config, &work_dir, &url).await,
    }
}

/// Process exit status for a failed run.
fn failure_status(err: &(dyn std::error::Error + 'static)) -> u8 {
    if err.is::<BatchTimedOut>() {
        BatchTimedOut::EXIT_STATUS
    } else {
        1
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let work_dir = match cli.work_dir.clone() {
        Some(dir) => dir,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("Failed to get current directory: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    match run(cli, work_dir).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            println!("{}", e);
            ExitCode::from(failure_status(e.as_ref()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd_scrape::BatchChoiceError;

    #[test]
    fn test_timeout_has_its_own_exit_status() {
        let timed_out: Box<dyn std::error::Error> = Box::new(BatchTimedOut {
            batch: "03".to_string(),
            secs: 14400,
        });
        assert_eq!(failure_status(timed_out.as_ref()), 2);

        let invalid: Box<dyn std::error::Error> = Box::new(BatchChoiceError::OutOfRange);
        assert_eq!(failure_status(invalid.as_ref()), 1);
    }
}
