//! HTTP fetch client for the JCDecaux APIs
//!
//! This module provides the `Fetch` trait used by the cache manager to issue
//! GET requests, and its production implementation backed by `reqwest`.
//! Keeping the trait object-safe lets tests substitute a recording fake and
//! assert on the presence or absence of network calls.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// Errors that can occur when fetching a resource
///
/// Transport failures, TLS failures, and non-2xx statuses all collapse into
/// this one type with a human-readable description; the manager performs no
/// retry in either case.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed at the transport or TLS layer
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("request to {url} returned HTTP status {status}")]
    Status { status: u16, url: String },
}

/// Issues an HTTPS GET and captures the response body
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Production fetcher backed by a `reqwest` client
///
/// Certificate verification is enabled by default; callers must opt out
/// explicitly via [`HttpFetcher::with_insecure_tls`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with TLS peer verification enabled
    pub fn new() -> Result<Self, FetchError> {
        Self::with_insecure_tls(false)
    }

    /// Creates a fetcher, optionally disabling TLS certificate verification
    ///
    /// Passing `true` accepts any server certificate and should only be used
    /// against endpoints whose certificate chain is known to be broken.
    pub fn with_insecure_tls(insecure: bool) -> Result<Self, FetchError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}
