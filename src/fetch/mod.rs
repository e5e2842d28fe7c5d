//! HTTP transport seam for icon fetches.
//!
//! The audit pipeline never talks to `reqwest` directly. It calls a
//! [`Fetcher`], which returns the status code and body of one GET request or
//! a [`FetchError`] when the request could not be built or the transport
//! failed. [`HttpFetcher`] is the production implementation; tests plug in
//! scripted fetchers to control timing and failures.
//!
//! # Example
//!
//! ```no_run
//! use icon_audit::fetch::{Fetcher, HttpFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = HttpFetcher::new()?;
//! let response = fetcher.fetch("https://example.com/icons/1/icon.png").await?;
//! println!("status {} ({} bytes)", response.status, response.body.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

use async_trait::async_trait;

pub use client::HttpFetcher;
pub use error::FetchError;

/// HTTP status treated as "resource present".
pub const SUCCESS_STATUS: u16 = 200;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body. Implementations may leave it empty for non-success
    /// statuses, since the audit never inspects those bodies.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Creates a response from a status code and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true when the status is exactly 200.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }
}

/// One-shot GET transport.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issues a GET request for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::RequestBuild`] if no request could be built for
    /// the URL and [`FetchError::Transport`] on network-level failures. A
    /// non-success HTTP status is NOT an error.
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError>;
}
