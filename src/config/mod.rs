//! Configuration module for Volby-Scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional: a missing file section (or no file at all) falls
//! back to the defaults suited to volby.cz.
//!
//! # Example
//!
//! ```no_run
//! use volby_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("volby.toml")).unwrap();
//! println!("Delay between requests: {}ms", config.scraper.request_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ColumnOrder, Config, FailurePolicy, ScraperConfig, SourceConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
pub use validation::validate;
