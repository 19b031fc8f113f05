//! URL handling module for Volby-Scraper
//!
//! This module validates listing URLs given on the command line and resolves
//! the relative links found on result pages.

mod resolve;
mod validate;

// Re-export main functions
pub use resolve::resolve_link;
pub use validate::validate_listing_url;
