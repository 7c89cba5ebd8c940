//! Async HTTP client shared by the link enumerator and the branch fetches.

use crate::scraper::error::ScraperError;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; oriencoop-scrape/0.1; +https://oriencoop.cl)";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_REDIRECTS: usize = 10;

/// Thin wrapper over `reqwest::Client` that turns non-success statuses into errors.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct SiteClient {
    inner: reqwest::Client,
}

impl SiteClient {
    /// Build a client with default User-Agent and timeout.
    pub fn new() -> Result<Self, ScraperError> {
        Self::builder().build()
    }

    /// Builder for custom User-Agent and/or timeout.
    pub fn builder() -> SiteClientBuilder {
        SiteClientBuilder::default()
    }

    /// GET `url` and return the body as text. Fails on transport errors and non-2xx statuses.
    pub async fn get_text(&self, url: &str) -> Result<String, ScraperError> {
        log::debug!("GET {}", url);
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| ScraperError::Network {
                url: url.to_string(),
                source: e,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        response.text().await.map_err(|e| ScraperError::BodyRead {
            url: url.to_string(),
            source: e,
        })
    }
}

/// Builder for SiteClient with optional User-Agent and timeout.
#[derive(Debug)]
pub struct SiteClientBuilder {
    user_agent: Option<String>,
    timeout_secs: u64,
}

impl Default for SiteClientBuilder {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SiteClientBuilder {
    /// Set a custom User-Agent. If not set, a crate-identifying default is used.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set request timeout in seconds. Default 30.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<SiteClient, ScraperError> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let inner = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| ScraperError::Client { source: e })?;
        Ok(SiteClient { inner })
    }
}
