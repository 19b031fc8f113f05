//! Volby-Scraper: election results to CSV
//!
//! This crate crawls a territorial-unit listing page of the 2017 Czech
//! parliamentary election results site, visits every municipality detail page
//! it links to, and aggregates registered voters, envelopes, valid votes and
//! per-party vote counts into a single CSV table.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod url;

use thiserror::Error;

pub use extract::ExtractError;
pub use output::OutputError;

/// Main error type for Volby-Scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("{context}: {source}")]
    Extract {
        context: String,
        source: ExtractError,
    },

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Failure categories surfaced to the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Fetch,
    UnexpectedPageShape,
    MalformedField,
    Output,
}

impl ScrapeError {
    /// Returns the failure category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) | Self::Config(_) => ErrorKind::InvalidArgument,
            Self::Client(_)
            | Self::Http { .. }
            | Self::HttpStatus { .. }
            | Self::Timeout { .. } => ErrorKind::Fetch,
            Self::Extract { source, .. } => match source {
                ExtractError::UnexpectedPageShape(_) | ExtractError::InvalidSelector(_) => {
                    ErrorKind::UnexpectedPageShape
                }
                ExtractError::MalformedField { .. } => ErrorKind::MalformedField,
            },
            Self::Output(_) => ErrorKind::Output,
        }
    }

    /// Process exit code for this error
    ///
    /// | Kind | Code |
    /// |------|------|
    /// | InvalidArgument | 2 |
    /// | Fetch | 3 |
    /// | UnexpectedPageShape, MalformedField | 4 |
    /// | Output | 5 |
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::InvalidArgument => 2,
            ErrorKind::Fetch => 3,
            ErrorKind::UnexpectedPageShape | ErrorKind::MalformedField => 4,
            ErrorKind::Output => 5,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid host pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Volby-Scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use crawler::{Aggregator, MunicipalityResult, ResultTable};
pub use config::Config;
pub use extract::{ListingEntry, MunicipalityDetail, ResultExtractor, VolbyExtractor};
