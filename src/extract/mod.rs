//! Result extraction from election result pages
//!
//! This module turns the raw HTML of result pages into typed records:
//! - Listing pages: one [`ListingEntry`] per municipality row
//! - Detail pages: the summary counts and per-party votes of one municipality
//!
//! All page-layout knowledge lives behind the [`ResultExtractor`] trait, so
//! the crawl and the output never depend on particular selectors.

mod listing;
mod municipality;
mod numbers;

pub use numbers::{normalize_count, parse_count};

use scraper::{ElementRef, Selector};
use thiserror::Error;
use url::Url;

/// Errors raised while extracting data from a page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unexpected page shape: {0}")]
    UnexpectedPageShape(String),

    #[error("malformed field '{field}': cannot read '{value}' as a count")]
    MalformedField { field: String, value: String },

    #[error("invalid selector '{0}'")]
    InvalidSelector(String),
}

/// Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;

/// One municipality row of a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Municipality code (six digits on volby.cz)
    pub code: String,

    /// Municipality display name
    pub name: String,

    /// Absolute URL of the municipality detail page
    pub detail_url: Url,
}

/// Ordered party name → vote count mapping
///
/// Keeps parties in the order they were inserted. Inserting a name that is
/// already present replaces its count but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyVotes {
    entries: Vec<(String, u64)>,
}

impl PartyVotes {
    /// Creates an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the count for `party`
    pub fn insert(&mut self, party: impl Into<String>, votes: u64) {
        let party = party.into();
        match self.entries.iter_mut().find(|(name, _)| *name == party) {
            Some(entry) => entry.1 = votes,
            None => self.entries.push((party, votes)),
        }
    }

    /// Returns the count for `party`, if the page listed it
    pub fn get(&self, party: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| name == party)
            .map(|(_, votes)| *votes)
    }

    /// Party names in page order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// (party, votes) pairs in page order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|(name, votes)| (name.as_str(), *votes))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all party votes
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, votes)| votes).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for PartyVotes {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut votes = Self::new();
        for (party, count) in iter {
            votes.insert(party, count);
        }
        votes
    }
}

/// Figures read from one municipality detail page
///
/// Code and name are not part of the detail page; the caller takes them from
/// the [`ListingEntry`] that led to the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MunicipalityDetail {
    /// Registered voters
    pub registered: u64,

    /// Envelopes issued
    pub envelopes: u64,

    /// Valid votes
    pub valid: u64,

    /// Votes per party, in page order
    pub votes: PartyVotes,
}

/// Turns result page HTML into typed records
pub trait ResultExtractor {
    /// Extracts the municipality rows of a listing page
    ///
    /// # Arguments
    ///
    /// * `html` - The listing page HTML
    /// * `base_url` - URL of the listing page, used to resolve relative links
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ListingEntry>)` - Entries in page order; empty when the
    ///   listing table has no municipality rows
    /// * `Err(ExtractError::UnexpectedPageShape)` - The page is not a listing page
    fn extract_listing(&self, html: &str, base_url: &Url) -> ExtractResult<Vec<ListingEntry>>;

    /// Extracts the summary counts and party votes of a detail page
    ///
    /// # Returns
    ///
    /// * `Ok(MunicipalityDetail)` - The extracted figures
    /// * `Err(ExtractError::UnexpectedPageShape)` - Summary or party tables missing
    /// * `Err(ExtractError::MalformedField)` - A count could not be read
    fn extract_municipality(&self, html: &str) -> ExtractResult<MunicipalityDetail>;
}

/// Extractor for the 2017 Chamber of Deputies pages on volby.cz
///
/// The locators default to the `ps32` (listing) and `ps311` (detail) page
/// layouts and can be overridden with the `with_*` builder methods.
#[derive(Debug, Clone)]
pub struct VolbyExtractor {
    /// Substring identifying municipality detail links
    detail_link_marker: String,
    /// CSS selector of the cell holding a party name
    party_name_selector: String,
    /// Class carried by numeric cells
    number_class: String,
    /// Label of the registered voters cell
    registered_label: String,
    /// Label of the issued envelopes cell
    envelopes_label: String,
    /// Label of the valid votes cell
    valid_label: String,
}

impl Default for VolbyExtractor {
    fn default() -> Self {
        Self {
            detail_link_marker: "ps311".to_owned(),
            party_name_selector: "td.overflow_name".to_owned(),
            number_class: "cislo".to_owned(),
            registered_label: "Voliči v seznamu".to_owned(),
            envelopes_label: "Vydané obálky".to_owned(),
            valid_label: "Platné hlasy".to_owned(),
        }
    }
}

impl VolbyExtractor {
    /// Creates an extractor with the volby.cz locators
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the substring that identifies detail page links
    #[must_use]
    pub fn with_detail_link_marker(mut self, marker: &str) -> Self {
        marker.clone_into(&mut self.detail_link_marker);
        self
    }

    /// Overrides the CSS selector of party name cells
    #[must_use]
    pub fn with_party_name_selector(mut self, selector: &str) -> Self {
        selector.clone_into(&mut self.party_name_selector);
        self
    }

    /// Overrides the summary labels (registered, envelopes, valid)
    #[must_use]
    pub fn with_summary_labels(mut self, registered: &str, envelopes: &str, valid: &str) -> Self {
        registered.clone_into(&mut self.registered_label);
        envelopes.clone_into(&mut self.envelopes_label);
        valid.clone_into(&mut self.valid_label);
        self
    }
}

impl ResultExtractor for VolbyExtractor {
    fn extract_listing(&self, html: &str, base_url: &Url) -> ExtractResult<Vec<ListingEntry>> {
        listing::extract_listing(self, html, base_url)
    }

    fn extract_municipality(&self, html: &str) -> ExtractResult<MunicipalityDetail> {
        municipality::extract_municipality(self, html)
    }
}

/// Parses a CSS selector, returning an [`ExtractError`] on failure
fn parse_selector(selector: &str) -> ExtractResult<Selector> {
    Selector::parse(selector).map_err(|_| ExtractError::InvalidSelector(selector.to_owned()))
}

/// Text content of an element with whitespace collapsed and trimmed
fn cell_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
