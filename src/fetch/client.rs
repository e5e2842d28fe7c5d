//! `reqwest`-backed [`Fetcher`] implementation.
//!
//! The client speaks HTTP/1.1 only, every request carries `Connection: close`
//! and no idle connections are kept, so each of the tens of thousands of
//! one-shot GETs releases its socket as soon as the response is read. Over
//! HTTP/2 the header is dropped and requests share one connection.
//!
//! No timeouts are configured; a stalled server holds its request (and its
//! limiter slot) until the peer gives up.

use async_trait::async_trait;
use reqwest::{Client, Version};
use reqwest::header::{CONNECTION, HeaderValue};
use tracing::{debug, instrument};

use super::error::FetchError;
use super::{FetchResponse, Fetcher};
use crate::user_agent;

/// HTTP transport with connection reuse disabled.
///
/// Cheap to clone; clones share the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the default `icon-audit/<version>` User-Agent.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the TLS backend or system
    /// configuration prevents building a client.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .http1_only()
            .pool_max_idle_per_host(0)
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(|source| FetchError::ClientBuild { source })?;
        Ok(Self { client })
    }

    /// Builds the GET request for `url` without sending it.
    fn build_request(&self, url: &str) -> Result<reqwest::Request, FetchError> {
        self.client
            .get(url)
            .version(Version::HTTP_11)
            .header(CONNECTION, HeaderValue::from_static("close"))
            .build()
            .map_err(|e| FetchError::request_build(url, e.to_string()))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(level = "trace", skip(self))]
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let request = self.build_request(url)?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        let status = response.status().as_u16();
        if status != super::SUCCESS_STATUS {
            debug!(status, "non-success status, skipping body");
            return Ok(FetchResponse::new(status, Vec::new()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        Ok(FetchResponse::new(status, body.to_vec()))
    }
}
