use encoding_rs::Encoding;
use serde::Deserialize;

/// Main configuration structure for Volby-Scraper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

/// Scraping behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Delay before each municipality request (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Total timeout for a single request (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for establishing a connection (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// What to do when a single municipality cannot be fetched or parsed
    #[serde(rename = "failure-policy", default)]
    pub failure_policy: FailurePolicy,

    /// Order of the party columns in the output
    #[serde(rename = "column-order", default)]
    pub column_order: ColumnOrder,

    /// Encoding used when a response does not declare a charset
    #[serde(rename = "fallback-encoding", default = "default_fallback_encoding")]
    pub fallback_encoding: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            failure_policy: FailurePolicy::default(),
            column_order: ColumnOrder::default(),
            fallback_encoding: default_fallback_encoding(),
        }
    }
}

impl ScraperConfig {
    /// Encoding named by `fallback-encoding`, if the label is known
    pub fn resolve_fallback_encoding(&self) -> Option<&'static Encoding> {
        Encoding::for_label(self.fallback_encoding.trim().as_bytes())
    }
}

/// Handling of a municipality whose detail page fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the whole run; no output is written
    #[default]
    Abort,
    /// Log a warning, leave the municipality out and carry on
    Skip,
}

/// Ordering of the party columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnOrder {
    /// Order in which parties were first encountered during the crawl
    #[default]
    FirstSeen,
    /// Lexical order of party names
    Alphabetical,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the scraper
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url", default = "default_contact_url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: default_contact_url(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Restrictions on which listing URLs are accepted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
    /// Hosts the listing URL may point at; empty accepts any host
    #[serde(rename = "allowed-hosts", default)]
    pub allowed_hosts: Vec<String>,
}

fn default_request_delay_ms() -> u64 {
    200
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_fallback_encoding() -> String {
    "windows-1250".to_string()
}

fn default_crawler_name() -> String {
    "VolbyScraper".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_contact_url() -> String {
    "https://www.volby.cz/".to_string()
}
