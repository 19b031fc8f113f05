//! Output module for writing scrape results
//!
//! This module handles:
//! - Writing the aggregated table as a CSV file
//! - Summarizing a finished scrape on the console

mod csv_writer;
pub mod stats;

pub use csv_writer::{to_csv_string, write_csv, write_table, UTF8_BOM};
pub use stats::{print_summary, RunSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
