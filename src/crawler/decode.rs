//! Response body decoding
//!
//! volby.cz serves `windows-1250` pages and does not always name the charset
//! in the `Content-Type` header. The encoding is chosen in this order:
//! 1. `charset` parameter of the `Content-Type` header
//! 2. `<meta charset>` or `<meta http-equiv="Content-Type">` in the first
//!    [`SNIFF_LEN`] bytes of the body
//! 3. The configured fallback encoding
//!
//! A byte-order mark at the start of the body overrides all three.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Number of leading body bytes searched for a meta charset declaration
pub const SNIFF_LEN: usize = 1024;

/// Decodes `bytes` using the declared, detected or fallback encoding
///
/// Malformed sequences are replaced with U+FFFD and logged.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>, fallback: &'static Encoding) -> String {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .or_else(|| sniff_meta_charset(bytes))
        .unwrap_or(fallback);

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!("Body is not valid {}; invalid bytes replaced", used.name());
    }
    tracing::trace!("Decoded body as {}", used.name());

    text.into_owned()
}

/// Encoding named by the `charset` parameter of a `Content-Type` value
pub fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| {
            Encoding::for_label(value.trim().trim_matches(|c: char| c == '"' || c == '\'').as_bytes())
        })
}

/// Encoding declared by a `<meta>` tag near the start of the document
///
/// A declared UTF-16 label means UTF-8: a page that could be scanned as
/// ASCII here is not UTF-16.
pub fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    for tag in head.split("<meta").skip(1) {
        let tag = tag.split('>').next().unwrap_or_default();
        let Some(pos) = tag.find("charset") else {
            continue;
        };

        let Some(value) = tag["charset".len() + pos..].trim_start().strip_prefix('=') else {
            continue;
        };
        let label: String = value
            .trim_start()
            .trim_start_matches(|c: char| c == '"' || c == '\'')
            .chars()
            .take_while(|&c| !matches!(c, '"' | '\'' | ';' | '/') && !c.is_whitespace())
            .collect();

        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            if encoding == UTF_16LE || encoding == UTF_16BE {
                return Some(UTF_8);
            }
            return Some(encoding);
        }
    }

    None
}
