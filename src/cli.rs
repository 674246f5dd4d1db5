//! CLI definitions for wahlscrape.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// wahlscrape CLI.
#[derive(Parser)]
#[command(name = "wahlscrape")]
#[command(about = "Resumable scraper for municipal election open-data links")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Working directory; relative output paths resolve against it
    #[arg(short, long, global = true)]
    pub work_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Scrape one batch of municipalities (default)
    Scrape {
        /// Batch number to run without prompting (1-based)
        #[arg(short, long)]
        batch: Option<String>,
    },

    /// Reconcile the reference table with result files and the ledger
    Report,

    /// Start one browser session, open a page and print its title
    Probe {
        /// Page to open
        #[arg(default_value = "https://example.org")]
        url: String,
    },
}
