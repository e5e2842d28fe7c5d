//! Per-identifier outcome records.

use std::fmt;

use serde::Serialize;

/// Why an identifier could not be fully checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The URL or request could not be constructed.
    RequestBuildFailed,
    /// Network-level failure reaching the server.
    TransportFailed,
    /// The body could not be decoded as any registered image format.
    DecodeFailed,
}

impl ErrorKind {
    /// Returns a stable label for logs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequestBuildFailed => "request_build_failed",
            Self::TransportFailed => "transport_failed",
            Self::DecodeFailed => "decode_failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anomaly record for one identifier.
///
/// Only produced for identifiers that were not a clean success: either the
/// format differs from the expected one (`failure` is `None`) or the fetch
/// or decode failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconOutcome {
    /// Identifier the URL was rendered from.
    pub id: u32,
    /// Fetched URL; empty when the request could not be built.
    pub url: String,
    /// Sniffed format name; empty when undetermined.
    pub detected_format: String,
    /// Failure category, absent for a format mismatch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ErrorKind>,
    /// Human-readable failure description, present iff `failure` is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IconOutcome {
    /// Creates a format-mismatch record.
    #[must_use]
    pub fn mismatch(id: u32, url: impl Into<String>, detected_format: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            detected_format: detected_format.into(),
            failure: None,
            message: None,
        }
    }

    /// Creates a failure record.
    #[must_use]
    pub fn failed(
        id: u32,
        url: impl Into<String>,
        detected_format: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            url: url.into(),
            detected_format: detected_format.into(),
            failure: Some(kind),
            message: Some(message.into()),
        }
    }

    /// Returns true if this record is a failure rather than a mismatch.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// `url: <url> | type: <format>[ | error: <message>]`
impl fmt::Display for IconOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "url: {} | type: {}", self.url, self.detected_format)?;
        if let Some(kind) = self.failure {
            let message = self.message.as_deref().unwrap_or(kind.as_str());
            write!(f, " | error: {message}")?;
        }
        Ok(())
    }
}
