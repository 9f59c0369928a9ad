use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::retry::{is_retryable_status, with_retry, RetryConfig};

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Catalog request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Catalog not found at {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::RequestFailed { status, .. } => reqwest::StatusCode::from_u16(*status)
                .map(is_retryable_status)
                .unwrap_or(false),
            FetchError::RateLimitExceeded => true,
            FetchError::NetworkError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            FetchError::NotFound(_) | FetchError::ParseError(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Fetches the catalog document from a static URL
pub struct CatalogClient {
    client: reqwest::Client,
    retry_config: RetryConfig,
}

impl CatalogClient {
    /// Create client with custom retry configuration
    pub fn with_retry_config(timeout: Duration, retry_config: RetryConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            retry_config,
        })
    }

    /// GET the document body as text
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("Fetching catalog from {}", url);

        let body = with_retry(&self.retry_config, FetchError::is_retryable, || async {
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound(url.to_string()));
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(FetchError::RateLimitExceeded);
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(FetchError::RequestFailed {
                    status: status.as_u16(),
                    body,
                });
            }

            Ok::<_, FetchError>(response.text().await?)
        })
        .await?;

        info!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// GET the document and parse it as JSON
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.fetch_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
