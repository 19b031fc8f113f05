//! Detail page extraction
//!
//! A detail page carries a summary table (registered voters, issued envelopes,
//! valid votes, ...) and one or more party tables. Summary labels are usually
//! `th` header cells with an `id`; the value cell references that id in its
//! `headers` attribute. When a label sits in a plain `td`, the value is the
//! last numeric cell of the same row.

use super::numbers::{has_digit, parse_field};
use super::{
    cell_text, parse_selector, ExtractError, ExtractResult, MunicipalityDetail, PartyVotes,
    VolbyExtractor,
};
use scraper::{ElementRef, Html, Selector};

pub(super) fn extract_municipality(
    extractor: &VolbyExtractor,
    html: &str,
) -> ExtractResult<MunicipalityDetail> {
    let document = Html::parse_document(html);

    let label_sel = parse_selector("th, td")?;
    let cell_sel = parse_selector("td")?;

    let registered = labeled_count(
        &document,
        &label_sel,
        &cell_sel,
        &extractor.registered_label,
        &extractor.number_class,
        "registered",
    )?;
    let envelopes = labeled_count(
        &document,
        &label_sel,
        &cell_sel,
        &extractor.envelopes_label,
        &extractor.number_class,
        "envelopes",
    )?;
    let valid = labeled_count(
        &document,
        &label_sel,
        &cell_sel,
        &extractor.valid_label,
        &extractor.number_class,
        "valid",
    )?;

    let votes = party_votes(&document, &extractor.party_name_selector, &cell_sel)?;

    Ok(MunicipalityDetail {
        registered,
        envelopes,
        valid,
        votes,
    })
}

/// Reads the count belonging to a summary label
fn labeled_count(
    document: &Html,
    label_sel: &Selector,
    cell_sel: &Selector,
    label: &str,
    number_class: &str,
    field: &str,
) -> ExtractResult<u64> {
    let missing = || ExtractError::UnexpectedPageShape(format!("no '{}' summary cell", label));

    let label_cell = document
        .select(label_sel)
        .find(|cell| cell_text(*cell) == label)
        .ok_or_else(missing)?;

    let value_cell = match label_cell.value().attr("id") {
        Some(id) if label_cell.value().name() == "th" => {
            referencing_cell(document, cell_sel, id)
        }
        _ => row_value_cell(label_cell, cell_sel, number_class),
    }
    .ok_or_else(missing)?;

    parse_field(&cell_text(value_cell), field)
}

/// First `td` whose `headers` attribute lists `id`
fn referencing_cell<'a>(document: &'a Html, cell_sel: &Selector, id: &str) -> Option<ElementRef<'a>> {
    document.select(cell_sel).find(|cell| {
        cell.value()
            .attr("headers")
            .is_some_and(|headers| headers.split_whitespace().any(|h| h == id))
    })
}

/// Last numeric cell in the row of `label_cell`, preferring cells with `number_class`
fn row_value_cell<'a>(
    label_cell: ElementRef<'a>,
    cell_sel: &Selector,
    number_class: &str,
) -> Option<ElementRef<'a>> {
    let row = label_cell
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "tr")?;

    let others: Vec<ElementRef<'a>> = row
        .select(cell_sel)
        .filter(|cell| cell.id() != label_cell.id())
        .collect();

    others
        .iter()
        .rev()
        .find(|cell| cell.value().classes().any(|c| c == number_class))
        .or_else(|| others.iter().rev().find(|cell| has_digit(&cell_text(**cell))))
        .copied()
}

/// Collects party → votes from every row holding a party name cell
///
/// The vote count is the first numeric cell after the name cell; later
/// numeric cells (percentages) are ignored.
fn party_votes(document: &Html, name_selector: &str, cell_sel: &Selector) -> ExtractResult<PartyVotes> {
    let row_sel = parse_selector("tr")?;
    let name_sel = parse_selector(name_selector)?;

    let mut votes = PartyVotes::new();

    for row in document.select(&row_sel) {
        let Some(name_cell) = row.select(&name_sel).next() else {
            continue;
        };

        let party = cell_text(name_cell);
        if party.is_empty() {
            continue;
        }

        let field = format!("votes for '{}'", party);
        let count_text = row
            .select(cell_sel)
            .skip_while(|cell| cell.id() != name_cell.id())
            .skip(1)
            .map(cell_text)
            .find(|text| has_digit(text))
            .ok_or_else(|| ExtractError::MalformedField {
                field: field.clone(),
                value: String::new(),
            })?;

        votes.insert(party, parse_field(&count_text, &field)?);
    }

    if votes.is_empty() {
        return Err(ExtractError::UnexpectedPageShape(
            "no party vote rows found".to_string(),
        ));
    }

    Ok(votes)
}
