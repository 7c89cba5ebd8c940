//! Site scraping: shared client, link enumeration, and branch extraction.

mod client;
mod error;

pub mod branches;
pub mod links;

pub use branches::extract_branches;
pub use client::{SiteClient, SiteClientBuilder};
pub use error::ScraperError;
pub use links::enumerate_links;

use crate::model::BranchRecord;
use scraper::Selector;

/// Default cap on detail pages fetched at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Options for a scrape run: fetch concurrency and an optional progress callback.
pub struct ScrapeOptions<'a> {
    /// Maximum number of detail pages in flight. Values below 1 are treated as 1.
    pub concurrency: usize,
    /// Called with (pages settled, total pages) after each detail page finishes.
    pub progress: Option<&'a dyn Fn(usize, usize)>,
}

impl Default for ScrapeOptions<'_> {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            progress: None,
        }
    }
}

/// Parse a CSS selector or return a parse error (avoids panics from Selector::parse).
pub(crate) fn parse_selector(sel: &str) -> Result<Selector, ScraperError> {
    Selector::parse(sel).map_err(|e| ScraperError::InvalidSelector {
        selector: sel.to_string(),
        reason: e.to_string(),
    })
}

/// Enumerate branch pages from the listing page, then extract every branch on them.
pub async fn scrape_branches(
    client: &SiteClient,
    listing_url: &str,
    origin: &str,
    options: &ScrapeOptions<'_>,
) -> Result<Vec<BranchRecord>, ScraperError> {
    let links = enumerate_links(client, listing_url, origin).await?;
    extract_branches(client, &links, options).await
}
