//! Integration tests for the scraper
//!
//! These tests use wiremock to serve listing and detail pages and run the
//! whole scrape, down to the CSV file, against them.

mod cli_tests;
mod scrape_tests;
