//! Shared error type for link enumeration and branch extraction.

use thiserror::Error;

/// Shared scraper error for HTTP and page parsing.
#[derive(Debug, Error)]
pub enum ScraperError {
    // HTTP and network
    #[error("Network error: could not reach {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body from {url}: {source}")]
    BodyRead { url: String, source: reqwest::Error },

    #[error("Failed to build HTTP client: {source}")]
    Client { source: reqwest::Error },

    // Parsing
    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Could not parse branch page {url}: missing {what}")]
    MissingElement { url: String, what: String },

    #[error("Could not parse coordinates at {url}: {reason}")]
    Coordinates { url: String, reason: String },
}

impl ScraperError {
    pub(crate) fn missing(url: &str, what: impl Into<String>) -> Self {
        ScraperError::MissingElement {
            url: url.to_string(),
            what: what.into(),
        }
    }

    pub(crate) fn coordinates(url: &str, reason: impl Into<String>) -> Self {
        ScraperError::Coordinates {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
