//! Image catalog API client.
//!
//! Talks to an Unsplash-compatible search endpoint over HTTP. The catalog is
//! the source of truth for images; nothing is synced or cached locally.

pub mod types;

pub use types::{CandidateUrls, CatalogPage, ImageCandidate};

use std::sync::Arc;

use secrecy::ExposeSecret;
use shutterfinch_core::SearchTerm;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::CatalogConfig;

/// Errors that can occur when querying the image catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the catalog.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Catalog returned a non-success status.
    #[error("Catalog returned HTTP {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
}

/// Client for the image catalog search API.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    api_url: String,
    access_key: String,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_string(),
                access_key: config.access_key.expose_secret().to_string(),
            }),
        }
    }

    /// Search the catalog for images matching a term.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::RateLimited` on HTTP 429, `CatalogError::Status`
    /// on other non-success statuses, and `CatalogError::Http`/`Parse` on
    /// transport or decoding failures.
    #[instrument(skip(self), fields(term = %term))]
    pub async fn search(
        &self,
        term: &SearchTerm,
        page: i64,
        per_page: i64,
    ) -> Result<CatalogPage, CatalogError> {
        let url = format!("{}/search/photos", self.inner.api_url);

        let response = self
            .inner
            .client
            .get(&url)
            .header(
                "Authorization",
                format!("Client-ID {}", self.inner.access_key),
            )
            .query(&[
                ("query", term.as_str()),
                ("page", &page.to_string()),
                ("per_page", &per_page.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status,
                message: response_text.chars().take(200).collect(),
            });
        }

        let page: CatalogPage = serde_json::from_str(&response_text)?;

        debug!(
            total = page.total,
            total_pages = page.total_pages,
            results = page.results.len(),
            "catalog search completed"
        );

        Ok(page)
    }
}
