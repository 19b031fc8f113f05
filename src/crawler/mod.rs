//! Crawler module for page fetching and result aggregation
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with explicit timeouts and charset detection
//! - Sequential crawl of the listing page and municipality detail pages
//! - Assembly of the result table with dynamically discovered party columns

mod coordinator;
pub mod decode;
mod fetcher;
mod table;

pub use coordinator::Aggregator;
pub use fetcher::{build_http_client, Fetcher};
pub use table::{
    MunicipalityResult, PartyColumns, ResultTable, SkippedMunicipality, TableBuilder,
    FIXED_COLUMNS,
};

use crate::config::Config;
use crate::ScrapeError;

/// Runs a complete scrape of one territorial unit
///
/// This is the main entry point for a scrape. It will:
/// 1. Build the HTTP client
/// 2. Fetch and extract the listing page
/// 3. Fetch and extract every municipality detail page
/// 4. Return the aggregated table
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `listing_url` - URL of the municipality listing page
///
/// # Returns
///
/// * `Ok(ResultTable)` - Scrape completed
/// * `Err(ScrapeError)` - Scrape failed; nothing has been written
pub async fn scrape(config: Config, listing_url: &str) -> Result<ResultTable, ScrapeError> {
    Aggregator::new(config)?.run(listing_url).await
}
