//! Bounded-concurrency fetch-classify-aggregate pipeline.
//!
//! # Components
//!
//! - [`Classifier`] - fetches one identifier's URL and classifies the body
//! - [`ConcurrencyLimiter`] - admission gate capping in-flight classifications
//! - [`AuditEngine`] - dispatches `[0, N)` and runs the completion barriers
//! - [`Collector`] - single-writer task draining one outcome stream
//! - [`AuditReport`] - id-ordered rendering of all anomalies

mod classifier;
mod collector;
mod engine;
mod limiter;
mod outcome;
mod report;

pub use classifier::{Classification, Classifier};
pub use collector::{Collector, ROUTING_CHANNEL_CAPACITY};
pub use engine::{AuditEngine, AuditError, AuditRun, AuditStats};
pub use limiter::{ConcurrencyLimiter, LimiterPermit};
pub use outcome::{ErrorKind, IconOutcome};
pub use report::AuditReport;
