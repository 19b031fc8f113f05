//! Count normalization
//!
//! Result pages print counts with Czech digit grouping: thousands are
//! separated by a regular space or a no-break space (`1 205`, `1&nbsp;205`).
//! Counts are stored as plain integers.

use super::{ExtractError, ExtractResult};

/// Characters accepted as thousands separators
const GROUP_SEPARATORS: &[char] = &[' ', '\u{a0}', '\u{202f}'];

/// Removes digit-grouping separators and surrounding whitespace
///
/// # Examples
///
/// ```
/// use volby_scraper::extract::normalize_count;
///
/// assert_eq!(normalize_count(" 12\u{a0}345 "), "12345");
/// ```
pub fn normalize_count(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !GROUP_SEPARATORS.contains(c))
        .collect()
}

/// Parses a grouped count such as `"12 345"`
///
/// Returns None unless the normalized text is a non-empty run of ASCII digits
/// that fits in a u64. Signs, decimal commas and any other characters are
/// rejected.
///
/// # Examples
///
/// ```
/// use volby_scraper::extract::parse_count;
///
/// assert_eq!(parse_count("12 345"), Some(12345));
/// assert_eq!(parse_count("12,3"), None);
/// ```
pub fn parse_count(raw: &str) -> Option<u64> {
    let digits = normalize_count(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parses a count, naming `field` in the error
pub(super) fn parse_field(raw: &str, field: &str) -> ExtractResult<u64> {
    parse_count(raw).ok_or_else(|| ExtractError::MalformedField {
        field: field.to_string(),
        value: raw.trim().to_string(),
    })
}

/// True if `text` contains at least one ASCII digit
pub(super) fn has_digit(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
}
