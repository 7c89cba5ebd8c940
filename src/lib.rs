//! oriencoop-scrape: CLI scraper for Oriencoop branch listings, outputting JSON or CSV.

pub mod cli;
pub mod config;
pub mod formats;
pub mod hours;
pub mod model;
pub mod scraper;

// Re-exports for CLI and consumers.
pub use formats::{write_csv, write_json, write_records, FormatError, OutputFormat};
pub use hours::parse_working_hours;
pub use model::{BranchRecord, BRAND_NAME};
pub use scraper::{
    enumerate_links, extract_branches, scrape_branches, ScrapeOptions, ScraperError, SiteClient,
    SiteClientBuilder,
};
