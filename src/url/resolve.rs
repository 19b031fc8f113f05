use url::Url;

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be ignored:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel:, data: schemes
/// - hrefs that do not resolve against `base_url`
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use url::Url;
/// use volby_scraper::url::resolve_link;
///
/// let base = Url::parse("https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ").unwrap();
/// let link = resolve_link("ps311?xjazyk=CZ&xobec=589268", &base).unwrap();
/// assert_eq!(
///     link.as_str(),
///     "https://www.volby.cz/pls/ps2017nss/ps311?xjazyk=CZ&xobec=589268"
/// );
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}
