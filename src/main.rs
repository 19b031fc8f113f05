//! Volby-Scraper main entry point
//!
//! This is the command-line interface for the election results scraper.

use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use volby_scraper::config::load_config_or_default;
use volby_scraper::output::{print_summary, write_csv, RunSummary};
use volby_scraper::{Aggregator, ScrapeError};

/// Volby-Scraper: 2017 Czech parliamentary election results to CSV
///
/// Reads the municipality listing of one territorial unit, visits every
/// municipality it links to and writes registered voters, envelopes, valid
/// votes and the votes of every party into one CSV file.
#[derive(Parser, Debug)]
#[command(name = "volby-scraper")]
#[command(version)]
#[command(about = "Scrapes 2017 Czech parliamentary election results into CSV", long_about = None)]
struct Cli {
    /// Listing page of a territorial unit
    /// (e.g. https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=12&xnumnuts=7103)
    #[arg(value_name = "LISTING_URL")]
    listing_url: String,

    /// Output CSV file; overwritten if it exists
    #[arg(value_name = "OUTPUT_CSV")]
    output: PathBuf,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("volby_scraper=info,warn"),
            1 => EnvFilter::new("volby_scraper=debug,info"),
            2 => EnvFilter::new("volby_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Scrapes the listing and writes the CSV file
async fn run(cli: &Cli) -> Result<(), ScrapeError> {
    let config = load_config_or_default(cli.config.as_deref())?;
    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    let started_at = Utc::now();

    let aggregator = Aggregator::new(config)?;
    let table = aggregator.run(&cli.listing_url).await?;

    tracing::info!("Writing results to: {}", cli.output.display());
    write_csv(&table, &cli.output)?;

    tracing::info!("Done: {} municipalities saved", table.rows().len());

    if !cli.quiet {
        let summary = RunSummary::from_table(&table, started_at, Utc::now());
        print_summary(&summary);
    }

    Ok(())
}
