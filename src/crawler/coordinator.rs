//! Scrape coordinator - main crawl orchestration logic
//!
//! This module drives one scrape of a territorial unit:
//! - Validating the listing URL
//! - Fetching and extracting the listing page
//! - Visiting every municipality detail page in listing order, one at a time
//! - Accumulating rows and party columns into a [`ResultTable`]

use crate::config::{Config, FailurePolicy};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::table::{MunicipalityResult, ResultTable, TableBuilder};
use crate::extract::{ListingEntry, ResultExtractor, VolbyExtractor};
use crate::url::validate_listing_url;
use crate::ScrapeError;
use std::time::{Duration, Instant};

/// Main scrape coordinator
///
/// Holds no per-run state: everything accumulated during [`Aggregator::run`]
/// lives inside that call, so one aggregator can run any number of times.
pub struct Aggregator<E = VolbyExtractor> {
    config: Config,
    fetcher: Fetcher,
    extractor: E,
}

impl Aggregator<VolbyExtractor> {
    /// Creates an aggregator with the volby.cz extractor
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Aggregator)` - Successfully created aggregator
    /// * `Err(ScrapeError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        let fetcher = Fetcher::new(&config)?;
        Ok(Self::with_parts(config, fetcher, VolbyExtractor::new()))
    }
}

impl<E: ResultExtractor> Aggregator<E> {
    /// Creates an aggregator from explicit parts
    pub fn with_parts(config: Config, fetcher: Fetcher, extractor: E) -> Self {
        Self {
            config,
            fetcher,
            extractor,
        }
    }

    /// Runs one scrape of the territorial unit behind `listing_url`
    ///
    /// Steps:
    /// 1. Validate the URL (no request is made for an invalid URL)
    /// 2. Fetch the listing page and extract its municipality entries
    /// 3. For each entry, in listing order: wait the configured delay, fetch
    ///    the detail page, extract it and append the row
    /// 4. Fix the party column order and return the table
    ///
    /// Under [`FailurePolicy::Abort`] the first failing municipality ends the
    /// run with its error. Under [`FailurePolicy::Skip`] it is logged, left
    /// out and listed in [`ResultTable::skipped`]. A failing listing page
    /// always ends the run.
    pub async fn run(&self, listing_url: &str) -> Result<ResultTable, ScrapeError> {
        let url = validate_listing_url(listing_url, &self.config.source)?;

        tracing::info!("Fetching municipality listing: {}", url);
        let html = self.fetcher.fetch(&url).await?;
        let entries = self
            .extractor
            .extract_listing(&html, &url)
            .map_err(|source| ScrapeError::Extract {
                context: format!("listing page {}", url),
                source,
            })?;

        let total = entries.len();
        tracing::info!("Found {} municipalities", total);

        let delay = Duration::from_millis(self.config.scraper.request_delay_ms);
        let start_time = Instant::now();
        let mut table = TableBuilder::new();

        for (index, entry) in entries.iter().enumerate() {
            tracing::info!("[{}/{}] {} {}", index + 1, total, entry.code, entry.name);

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match self.scrape_municipality(entry).await {
                Ok(row) => table.push(row),
                Err(e) => match self.config.scraper.failure_policy {
                    FailurePolicy::Abort => {
                        tracing::error!(
                            "Failed to process municipality {} ({}): {}",
                            entry.code,
                            entry.name,
                            e
                        );
                        return Err(e);
                    }
                    FailurePolicy::Skip => {
                        tracing::warn!(
                            "Skipping municipality {} ({}): {}",
                            entry.code,
                            entry.name,
                            e
                        );
                        table.skip(entry, e.to_string());
                    }
                },
            }
        }

        tracing::info!(
            "Scraped {} of {} municipalities in {:?}",
            table.row_count(),
            total,
            start_time.elapsed()
        );

        Ok(table.finish(self.config.scraper.column_order))
    }

    /// Fetches and extracts one municipality detail page
    async fn scrape_municipality(
        &self,
        entry: &ListingEntry,
    ) -> Result<MunicipalityResult, ScrapeError> {
        let html = self.fetcher.fetch(&entry.detail_url).await?;

        let detail = self
            .extractor
            .extract_municipality(&html)
            .map_err(|source| ScrapeError::Extract {
                context: format!("municipality {} ({})", entry.code, entry.name),
                source,
            })?;

        tracing::debug!(
            "{}: registered={} envelopes={} valid={} parties={}",
            entry.code,
            detail.registered,
            detail.envelopes,
            detail.valid,
            detail.votes.len()
        );

        let party_total = detail.votes.total();
        if party_total != detail.valid {
            tracing::warn!(
                "{} ({}): party votes sum to {} but the page reports {} valid votes",
                entry.code,
                entry.name,
                party_total,
                detail.valid
            );
        }

        Ok(MunicipalityResult::new(entry, detail))
    }
}
