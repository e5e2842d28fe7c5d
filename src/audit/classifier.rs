//! Fetch-and-classify step for a single identifier.

use std::sync::Arc;

use tracing::{debug, instrument};
use url::Url;

use super::outcome::{ErrorKind, IconOutcome};
use crate::config::UrlTemplate;
use crate::fetch::{FetchError, Fetcher};
use crate::sniff::FormatSniffer;

/// Result of classifying one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Non-200 status: treated as an absent resource, no record.
    Skipped {
        /// Status the server returned.
        status: u16,
    },
    /// Fetched with 200 and the expected format, no record.
    Matched,
    /// Decoded, but the format differs from the expected one.
    Mismatch(IconOutcome),
    /// Fetched with 200 but the body is not a decodable registered image.
    DecodeFailed(IconOutcome),
    /// The request could not be built or the transport failed.
    FetchFailed(IconOutcome),
}

/// Builds the URL for an identifier, fetches it, and sniffs the body.
///
/// Holds no mutable state; one instance is shared by every task of a run.
#[derive(Clone)]
pub struct Classifier {
    template: UrlTemplate,
    expected_format: String,
    fetcher: Arc<dyn Fetcher>,
    sniffer: Arc<dyn FormatSniffer>,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("template", &self.template)
            .field("expected_format", &self.expected_format)
            .finish_non_exhaustive()
    }
}

impl Classifier {
    /// Creates a classifier.
    #[must_use]
    pub fn new(
        template: UrlTemplate,
        expected_format: impl Into<String>,
        fetcher: Arc<dyn Fetcher>,
        sniffer: Arc<dyn FormatSniffer>,
    ) -> Self {
        Self {
            template,
            expected_format: expected_format.into(),
            fetcher,
            sniffer,
        }
    }

    /// Returns the format a clean success must have.
    #[must_use]
    pub fn expected_format(&self) -> &str {
        &self.expected_format
    }

    /// Classifies one identifier. Never fails: every problem is captured in
    /// the returned [`Classification`].
    ///
    /// The reported URL is the rendered template text; parsing only checks
    /// that it is usable. Decoding runs on the blocking pool, since a
    /// mis-served large image can take a while to decode.
    #[instrument(level = "debug", skip(self))]
    pub async fn classify(&self, id: u32) -> Classification {
        let url = self.template.render(id);
        if let Err(e) = Url::parse(&url) {
            debug!(%url, error = %e, "could not build request URL");
            return Classification::FetchFailed(IconOutcome::failed(
                id,
                "",
                "",
                ErrorKind::RequestBuildFailed,
                format!("invalid URL {url:?}: {e}"),
            ));
        }

        let response = match self.fetcher.fetch(&url).await {
            Ok(response) => response,
            Err(e) => {
                let kind = match e {
                    FetchError::RequestBuild { .. } => ErrorKind::RequestBuildFailed,
                    FetchError::Transport { .. } | FetchError::ClientBuild { .. } => {
                        ErrorKind::TransportFailed
                    }
                };
                debug!(%url, error = %e, %kind, "fetch failed");
                return Classification::FetchFailed(IconOutcome::failed(
                    id,
                    url,
                    "",
                    kind,
                    e.to_string(),
                ));
            }
        };

        if !response.is_success() {
            debug!(%url, status = response.status, "skipping non-success response");
            return Classification::Skipped {
                status: response.status,
            };
        }

        let sniffer = Arc::clone(&self.sniffer);
        let body = response.body;
        let sniffed = match tokio::task::spawn_blocking(move || sniffer.sniff(&body)).await {
            Ok(sniffed) => sniffed,
            Err(e) => {
                debug!(%url, error = %e, "decoder task failed");
                return Classification::DecodeFailed(IconOutcome::failed(
                    id,
                    url,
                    "",
                    ErrorKind::DecodeFailed,
                    format!("decoder task failed: {e}"),
                ));
            }
        };

        match sniffed {
            Ok(format) if format == self.expected_format => Classification::Matched,
            Ok(format) => {
                debug!(%url, %format, expected = %self.expected_format, "format mismatch");
                Classification::Mismatch(IconOutcome::mismatch(id, url, format))
            }
            Err(e) => {
                debug!(%url, error = %e, "decode failed");
                let detected = e.detected_format().unwrap_or_default();
                Classification::DecodeFailed(IconOutcome::failed(
                    id,
                    url,
                    detected,
                    ErrorKind::DecodeFailed,
                    e.to_string(),
                ))
            }
        }
    }
}
