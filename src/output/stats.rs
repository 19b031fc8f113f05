//! Run summary
//!
//! This module condenses a finished scrape into a few totals and prints them
//! once the CSV file is written.

use crate::crawler::ResultTable;
use chrono::{DateTime, Utc};

/// Totals of one scrape run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// When the scrape started
    pub started_at: DateTime<Utc>,

    /// When the output was written
    pub finished_at: DateTime<Utc>,

    /// Municipalities written to the table
    pub municipalities: usize,

    /// Distinct party columns
    pub parties: usize,

    /// Municipalities left out under the skip policy, with the reason
    pub skipped: Vec<(String, String)>,

    /// Sum of registered voters over all rows
    pub total_registered: u64,

    /// Sum of issued envelopes over all rows
    pub total_envelopes: u64,

    /// Sum of valid votes over all rows
    pub total_valid: u64,
}

impl RunSummary {
    /// Summarizes `table`
    pub fn from_table(
        table: &ResultTable,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let rows = table.rows();
        Self {
            started_at,
            finished_at,
            municipalities: rows.len(),
            parties: table.parties().len(),
            skipped: table
                .skipped()
                .iter()
                .map(|s| (format!("{} {}", s.code, s.name), s.reason.clone()))
                .collect(),
            total_registered: rows.iter().map(|r| r.registered).sum(),
            total_envelopes: rows.iter().map(|r| r.envelopes).sum(),
            total_valid: rows.iter().map(|r| r.valid).sum(),
        }
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Issued envelopes as a percentage of registered voters
    pub fn turnout(&self) -> f64 {
        if self.total_registered == 0 {
            return 0.0;
        }
        (self.total_envelopes as f64 / self.total_registered as f64) * 100.0
    }
}

/// Prints the summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Scrape Summary ===\n");

    println!("Started: {}", summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Finished: {}", summary.finished_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Duration: {}s", summary.duration_seconds());
    println!();

    println!("Municipalities: {}", summary.municipalities);
    println!("Party columns: {}", summary.parties);
    println!("Registered voters: {}", summary.total_registered);
    println!("Envelopes issued: {}", summary.total_envelopes);
    println!("Valid votes: {}", summary.total_valid);
    println!("Turnout: {:.2}%", summary.turnout());

    if !summary.skipped.is_empty() {
        println!();
        println!("Skipped municipalities ({}):", summary.skipped.len());
        for (municipality, reason) in &summary.skipped {
            println!("  - {}: {}", municipality, reason);
        }
    }
}
