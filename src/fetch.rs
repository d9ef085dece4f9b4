//! Page fetching.
//!
//! The pipeline never talks to the network directly; it goes through the
//! [`PageFetcher`] trait so tests can drive it with canned pages. The real
//! implementation is a thin wrapper over a shared [`reqwest::Client`].

use std::time::Duration;

use tracing::{debug, instrument};

use crate::error::{ImportError, Result};
use crate::models::RawPage;

/// Abstraction over fetching one page of HTML.
pub trait PageFetcher {
    /// Fetch a URL and return the page, or a failure signal.
    ///
    /// A non-success HTTP status is not an error here: it comes back as a
    /// [`RawPage`] so the caller can decide whether it is fatal (listing
    /// pages) or merely skippable (article pages).
    async fn fetch(&self, url: &str) -> Result<RawPage>;
}

/// HTTP fetcher backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("wikinews_import/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ImportError::Http {
                url: String::new(),
                source: e,
            })?;
        Ok(HttpFetcher { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<RawPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImportError::Http {
                url: url.to_string(),
                source: e,
            })?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let text = response.text().await.map_err(|e| ImportError::Http {
            url: url.to_string(),
            source: e,
        })?;
        debug!(status, bytes = text.len(), "Fetched page");
        Ok(RawPage {
            url: final_url,
            status,
            text,
        })
    }
}
