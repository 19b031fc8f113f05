use crate::config::SourceConfig;
use crate::ScrapeError;
use url::Url;

/// Validates a listing URL before any request is made
///
/// # Rules
///
/// 1. The URL must not be empty (after trimming)
/// 2. It must parse as an absolute URL
/// 3. The scheme must be HTTP or HTTPS
/// 4. It must have a host
/// 5. If `allowed_hosts` is non-empty, the host must be one of them
///    (case-insensitive)
///
/// The page shape itself is checked later by the extractor, not here.
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(ScrapeError::InvalidArgument)` - The URL failed one of the rules
///
/// # Examples
///
/// ```
/// use volby_scraper::config::SourceConfig;
/// use volby_scraper::url::validate_listing_url;
///
/// let url = validate_listing_url(
///     "https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=12&xnumnuts=7103",
///     &SourceConfig::default(),
/// )
/// .unwrap();
/// assert_eq!(url.host_str(), Some("www.volby.cz"));
/// ```
pub fn validate_listing_url(raw: &str, source: &SourceConfig) -> Result<Url, ScrapeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ScrapeError::InvalidArgument(
            "listing URL cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(raw).map_err(|e| {
        ScrapeError::InvalidArgument(format!("listing URL '{}' is not a valid URL: {}", raw, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ScrapeError::InvalidArgument(format!(
            "listing URL must use HTTP or HTTPS, got '{}'",
            url.scheme()
        )));
    }

    let host = url.host_str().ok_or_else(|| {
        ScrapeError::InvalidArgument(format!("listing URL '{}' has no host", raw))
    })?;

    if !source.allowed_hosts.is_empty()
        && !source
            .allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(host))
    {
        return Err(ScrapeError::InvalidArgument(format!(
            "listing URL host '{}' is not one of: {}",
            host,
            source.allowed_hosts.join(", ")
        )));
    }

    Ok(url)
}
