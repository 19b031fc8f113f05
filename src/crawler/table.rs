//! Result table assembly
//!
//! Party columns are not known up front: every municipality page may list its
//! own set of parties. Rows are accumulated together with the union of all
//! party names seen, and the header is only fixed once every row is in.

use crate::config::ColumnOrder;
use crate::extract::{ListingEntry, MunicipalityDetail, PartyVotes};
use std::collections::HashSet;

/// Columns that precede the party columns
pub const FIXED_COLUMNS: [&str; 5] = ["code", "location", "registered", "envelopes", "valid"];

/// Complete result of one municipality
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalityResult {
    pub code: String,
    pub name: String,
    pub registered: u64,
    pub envelopes: u64,
    pub valid: u64,
    pub votes: PartyVotes,
}

impl MunicipalityResult {
    /// Combines a listing entry with the figures read from its detail page
    pub fn new(entry: &ListingEntry, detail: MunicipalityDetail) -> Self {
        Self {
            code: entry.code.clone(),
            name: entry.name.clone(),
            registered: detail.registered,
            envelopes: detail.envelopes,
            valid: detail.valid,
            votes: detail.votes,
        }
    }
}

/// A municipality left out of the table under the skip failure policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMunicipality {
    pub code: String,
    pub name: String,
    pub reason: String,
}

/// Union of party names in first-seen order
#[derive(Debug, Clone, Default)]
pub struct PartyColumns {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl PartyColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every party of `votes` not seen before
    pub fn observe(&mut self, votes: &PartyVotes) {
        for party in votes.names() {
            if self.seen.insert(party.to_string()) {
                self.names.push(party.to_string());
            }
        }
    }

    /// Final column order
    pub fn finish(mut self, order: ColumnOrder) -> Vec<String> {
        if order == ColumnOrder::Alphabetical {
            self.names.sort();
        }
        self.names
    }
}

/// Accumulates rows during a crawl
#[derive(Debug, Default)]
pub struct TableBuilder {
    rows: Vec<MunicipalityResult>,
    parties: PartyColumns,
    skipped: Vec<SkippedMunicipality>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row and records its parties
    pub fn push(&mut self, row: MunicipalityResult) {
        self.parties.observe(&row.votes);
        self.rows.push(row);
    }

    /// Records a municipality that was left out
    pub fn skip(&mut self, entry: &ListingEntry, reason: impl Into<String>) {
        self.skipped.push(SkippedMunicipality {
            code: entry.code.clone(),
            name: entry.name.clone(),
            reason: reason.into(),
        });
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Fixes the party column order and returns the table
    pub fn finish(self, order: ColumnOrder) -> ResultTable {
        ResultTable {
            rows: self.rows,
            parties: self.parties.finish(order),
            skipped: self.skipped,
        }
    }
}

/// Aggregated results of one territorial unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<MunicipalityResult>,
    parties: Vec<String>,
    skipped: Vec<SkippedMunicipality>,
}

impl ResultTable {
    /// Builds a table from finished rows
    pub fn from_rows(rows: Vec<MunicipalityResult>, order: ColumnOrder) -> Self {
        let mut builder = TableBuilder::new();
        for row in rows {
            builder.push(row);
        }
        builder.finish(order)
    }

    /// Rows in listing order
    pub fn rows(&self) -> &[MunicipalityResult] {
        &self.rows
    }

    /// Party columns in output order
    pub fn parties(&self) -> &[String] {
        &self.parties
    }

    /// Municipalities left out under the skip policy
    pub fn skipped(&self) -> &[SkippedMunicipality] {
        &self.skipped
    }

    /// `code, location, registered, envelopes, valid` followed by the parties
    pub fn header(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.parties.iter().cloned())
            .collect()
    }

    /// Data rows as strings, one per municipality
    ///
    /// A party missing from a municipality's page is written as `0`.
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(move |row| {
            let mut record = Vec::with_capacity(FIXED_COLUMNS.len() + self.parties.len());
            record.push(row.code.clone());
            record.push(row.name.clone());
            record.push(row.registered.to_string());
            record.push(row.envelopes.to_string());
            record.push(row.valid.to_string());
            record.extend(
                self.parties
                    .iter()
                    .map(|party| row.votes.get(party).unwrap_or(0).to_string()),
            );
            record
        })
    }
}
