//! Icon Audit Library
//!
//! Bulk verification of remotely hosted icon images: every identifier in
//! `[0, N)` is rendered into a URL, fetched, and its real encoded format is
//! sniffed from the bytes. Identifiers whose format differs from the expected
//! one, or whose fetch or decode failed, are collected into an id-ordered
//! report.
//!
//! # Architecture
//!
//! - [`config`] - Validated audit configuration and URL template
//! - [`fetch`] - HTTP transport seam and the `reqwest` implementation
//! - [`sniff`] - Image format sniffing with a pluggable decoder registry
//! - [`audit`] - Classifier, limiter, dispatcher, collectors and report
//! - [`progress`] - Per-identifier progress notifications

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod audit;
pub mod config;
pub mod fetch;
pub mod progress;
pub mod sniff;
mod user_agent;

// Re-export commonly used types
pub use audit::{
    AuditEngine, AuditError, AuditReport, AuditRun, AuditStats, Classification, Classifier,
    ConcurrencyLimiter, ErrorKind, IconOutcome,
};
pub use config::{
    AuditConfig, ConfigError, DEFAULT_CONCURRENCY, DEFAULT_COUNT, DEFAULT_EXPECTED_FORMAT,
    DEFAULT_URL_TEMPLATE, UrlTemplate,
};
pub use fetch::{FetchError, FetchResponse, Fetcher, HttpFetcher};
pub use progress::{NoProgress, ProgressObserver};
pub use sniff::{FormatSniffer, ImageSniffer, SniffError};
