//! Error types for the fetch transport.

use thiserror::Error;

/// Errors returned by a [`Fetcher`](super::Fetcher).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request for this URL could not be constructed.
    #[error("failed to build request for {url}: {reason}")]
    RequestBuild {
        /// The URL the request was built for.
        url: String,
        /// Why the request could not be built.
        reason: String,
    },

    /// Network-level failure (DNS, connect, TLS, reading the body).
    #[error("transport error fetching {url}: {source}")]
    Transport {
        /// The URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Creates a request-build error.
    pub fn request_build(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RequestBuild {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a transport error from any error source.
    pub fn transport(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            url: url.into(),
            source: source.into(),
        }
    }
}

// No `From<reqwest::Error>`: every per-request variant needs the URL as context.
