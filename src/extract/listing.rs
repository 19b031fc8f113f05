//! Listing page extraction
//!
//! A listing page holds one or more tables (with `th` header cells) whose data
//! rows start with a six-digit municipality code, followed by the municipality
//! name. Somewhere in the row a link points at the municipality detail page.

use super::{cell_text, parse_selector, ExtractError, ExtractResult, ListingEntry, VolbyExtractor};
use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Length of a municipality code
const CODE_LEN: usize = 6;

pub(super) fn extract_listing(
    extractor: &VolbyExtractor,
    html: &str,
    base_url: &Url,
) -> ExtractResult<Vec<ListingEntry>> {
    let document = Html::parse_document(html);

    let table_sel = parse_selector("table")?;
    let header_sel = parse_selector("th")?;
    let row_sel = parse_selector("tr")?;
    let cell_sel = parse_selector("td")?;
    let link_sel = parse_selector("a[href]")?;

    let tables: Vec<ElementRef<'_>> = document
        .select(&table_sel)
        .filter(|table| table.select(&header_sel).next().is_some())
        .collect();

    if tables.is_empty() {
        return Err(ExtractError::UnexpectedPageShape(
            "no listing table with header cells found".to_string(),
        ));
    }

    let mut entries = Vec::new();
    let mut data_rows = 0usize;

    for table in tables {
        for row in table.select(&row_sel) {
            let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
            if cells.len() < 2 {
                // Header rows and spacer rows
                continue;
            }
            data_rows += 1;

            let code = cell_text(cells[0]);
            if !is_municipality_code(&code) {
                continue;
            }

            let name = cell_text(cells[1]);
            if name.is_empty() {
                tracing::warn!("Skipping municipality {}: empty name", code);
                continue;
            }

            let Some(detail_url) =
                find_detail_link(row, &cells, &link_sel, &extractor.detail_link_marker, base_url)
            else {
                tracing::warn!("Skipping municipality {} ({}): no detail link", code, name);
                continue;
            };

            entries.push(ListingEntry {
                code,
                name,
                detail_url,
            });
        }
    }

    // Data rows without a single municipality among them mean this is some
    // other kind of results page, e.g. a municipality detail page.
    if entries.is_empty() && data_rows > 0 {
        return Err(ExtractError::UnexpectedPageShape(format!(
            "{} table rows found but none holds a municipality code",
            data_rows
        )));
    }

    tracing::debug!("Extracted {} listing entries", entries.len());
    Ok(entries)
}

/// True for exactly six ASCII digits
fn is_municipality_code(text: &str) -> bool {
    text.len() == CODE_LEN && text.bytes().all(|b| b.is_ascii_digit())
}

/// Finds the detail link of a listing row
///
/// Preference order:
/// 1. Any link in the row whose href contains `marker`
/// 2. The link in the first cell
/// 3. The link in the last cell
fn find_detail_link(
    row: ElementRef<'_>,
    cells: &[ElementRef<'_>],
    link_sel: &Selector,
    marker: &str,
    base_url: &Url,
) -> Option<Url> {
    let marked = row
        .select(link_sel)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains(marker));

    let href = marked
        .or_else(|| first_href(cells.first()?, link_sel))
        .or_else(|| first_href(cells.last()?, link_sel))?;

    resolve_link(href, base_url)
}

fn first_href<'a>(cell: &ElementRef<'a>, link_sel: &Selector) -> Option<&'a str> {
    cell.select(link_sel).next()?.value().attr("href")
}
