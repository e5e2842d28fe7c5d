//! Audit engine: bounded dispatch, routing and the completion barriers.
//!
//! [`AuditEngine::run`] walks the identifier space `[0, count)`. For every
//! identifier it waits for a [`ConcurrencyLimiter`] slot and spawns one Tokio
//! task that classifies the identifier, routes any record to its collector,
//! releases the slot and reports one unit of progress.
//!
//! # Concurrency Model
//!
//! - The dispatch loop only waits for limiter admission, never for a task
//! - At most `concurrency` tasks hold a slot at any time
//! - Findings (mismatches, decode failures) and fetch errors each go to
//!   their own single-writer [`Collector`]
//! - Finished tasks are reaped while dispatching, so memory stays bounded by
//!   `concurrency` rather than by `count`
//! - First barrier: every remaining task is joined, then the routing senders
//!   are dropped, which closes both channels
//! - Second barrier: both collectors are awaited until drained
//!
//! Only after the second barrier is the [`AuditReport`] assembled.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use icon_audit::{AuditConfig, AuditEngine, HttpFetcher, ImageSniffer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = AuditEngine::new(
//!     AuditConfig::default(),
//!     Arc::new(HttpFetcher::new()?),
//!     Arc::new(ImageSniffer::default()),
//! )?;
//! let run = engine.run().await?;
//! print!("{}", run.report);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, instrument, warn};

use super::classifier::{Classification, Classifier};
use super::collector::Collector;
use super::limiter::ConcurrencyLimiter;
use super::outcome::IconOutcome;
use super::report::AuditReport;
use crate::config::{AuditConfig, ConfigError};
use crate::fetch::Fetcher;
use crate::progress::{NoProgress, ProgressObserver};
use crate::sniff::FormatSniffer;

/// Error type for audit engine operations.
///
/// Per-identifier failures are never reported through this type; they end
/// up as records in the [`AuditReport`].
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The configuration was rejected before dispatch.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The limiter's semaphore was closed unexpectedly.
    #[error("concurrency limiter closed unexpectedly")]
    LimiterClosed,

    /// A collector task panicked or was cancelled.
    #[error("{name} collector failed: {source}")]
    CollectorFailed {
        /// Name of the collector.
        name: &'static str,
        /// The join error.
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Counters for one audit run.
///
/// Updated from concurrent classifier tasks, hence the atomics.
#[derive(Debug, Default)]
pub struct AuditStats {
    dispatched: AtomicUsize,
    skipped: AtomicUsize,
    matched: AtomicUsize,
    mismatched: AtomicUsize,
    decode_failed: AtomicUsize,
    fetch_failed: AtomicUsize,
    panicked: AtomicUsize,
}

impl AuditStats {
    /// Creates a stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classifier tasks spawned.
    #[must_use]
    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }

    /// Identifiers skipped because of a non-200 status.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Identifiers that matched the expected format.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.matched.load(Ordering::SeqCst)
    }

    /// Identifiers whose format differed from the expected one.
    #[must_use]
    pub fn mismatched(&self) -> usize {
        self.mismatched.load(Ordering::SeqCst)
    }

    /// Identifiers whose body could not be decoded.
    #[must_use]
    pub fn decode_failed(&self) -> usize {
        self.decode_failed.load(Ordering::SeqCst)
    }

    /// Identifiers whose request could not be built or sent.
    #[must_use]
    pub fn fetch_failed(&self) -> usize {
        self.fetch_failed.load(Ordering::SeqCst)
    }

    /// Tasks that panicked before classifying.
    #[must_use]
    pub fn panicked(&self) -> usize {
        self.panicked.load(Ordering::SeqCst)
    }

    /// Number of classified identifiers (all outcomes).
    #[must_use]
    pub fn classified(&self) -> usize {
        self.skipped()
            + self.matched()
            + self.mismatched()
            + self.decode_failed()
            + self.fetch_failed()
    }

    fn increment_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_panicked(&self) {
        self.panicked.fetch_add(1, Ordering::SeqCst);
    }

    fn record(&self, classification: &Classification) {
        let counter = match classification {
            Classification::Skipped { .. } => &self.skipped,
            Classification::Matched => &self.matched,
            Classification::Mismatch(_) => &self.mismatched,
            Classification::DecodeFailed(_) => &self.decode_failed,
            Classification::FetchFailed(_) => &self.fetch_failed,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

/// Report plus counters from a finished run.
#[derive(Debug)]
pub struct AuditRun {
    /// Sorted anomaly report.
    pub report: AuditReport,
    /// Per-outcome counters, final once the run has returned.
    pub stats: Arc<AuditStats>,
}

/// Bounded-concurrency fetch-classify-aggregate pipeline.
#[derive(Debug)]
pub struct AuditEngine {
    config: AuditConfig,
    limiter: ConcurrencyLimiter,
    classifier: Arc<Classifier>,
}

impl AuditEngine {
    /// Creates an engine for one validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Config`] if the expected format is not one the
    /// sniffer can report, or the concurrency is out of range.
    #[instrument(level = "debug", skip(fetcher, sniffer))]
    pub fn new(
        config: AuditConfig,
        fetcher: Arc<dyn Fetcher>,
        sniffer: Arc<dyn FormatSniffer>,
    ) -> Result<Self, AuditError> {
        if !sniffer.supports(config.expected_format()) {
            return Err(ConfigError::UnsupportedFormat {
                format: config.expected_format().to_string(),
            }
            .into());
        }

        let limiter = ConcurrencyLimiter::new(config.concurrency())?;
        let classifier = Arc::new(Classifier::new(
            config.url_template().clone(),
            config.expected_format(),
            fetcher,
            sniffer,
        ));

        debug!(
            count = config.count(),
            concurrency = config.concurrency(),
            expected = config.expected_format(),
            template = config.url_template().as_str(),
            "creating audit engine"
        );

        Ok(Self {
            config,
            limiter,
            classifier,
        })
    }

    /// Returns the configuration this engine runs with.
    #[must_use]
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Returns the admission gate shared by the run's tasks.
    #[must_use]
    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Runs the audit without progress reporting.
    ///
    /// # Errors
    ///
    /// See [`run_with_progress`](Self::run_with_progress).
    pub async fn run(&self) -> Result<AuditRun, AuditError> {
        self.run_with_progress(Arc::new(NoProgress)).await
    }

    /// Runs the audit, notifying `progress` once per finished identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::LimiterClosed`] or [`AuditError::CollectorFailed`]
    /// on internal failures. Individual fetch or decode failures do NOT
    /// cause this method to error.
    #[instrument(
        skip(self, progress),
        fields(count = self.config.count(), concurrency = self.limiter.capacity())
    )]
    pub async fn run_with_progress(
        &self,
        progress: Arc<dyn ProgressObserver>,
    ) -> Result<AuditRun, AuditError> {
        let stats = Arc::new(AuditStats::new());
        let (finding_tx, findings) = Collector::<IconOutcome>::spawn("findings");
        let (error_tx, errors) = Collector::<IconOutcome>::spawn("errors");
        let mut tasks = JoinSet::new();

        info!("starting audit");

        for id in 0..self.config.count() {
            // Blocks while `concurrency` tasks hold a slot
            let permit = self.limiter.acquire().await?;

            let classifier = Arc::clone(&self.classifier);
            let task_stats = Arc::clone(&stats);
            let progress = Arc::clone(&progress);
            let finding_tx = finding_tx.clone();
            let error_tx = error_tx.clone();

            stats.increment_dispatched();
            tasks.spawn(async move {
                let classification = classifier.classify(id).await;
                task_stats.record(&classification);

                match classification {
                    Classification::Mismatch(outcome) | Classification::DecodeFailed(outcome) => {
                        route(&finding_tx, outcome).await;
                    }
                    Classification::FetchFailed(outcome) => route(&error_tx, outcome).await,
                    Classification::Skipped { .. } | Classification::Matched => {}
                }

                drop(permit);
                progress.unit_done();
            });

            // Keeps the set at roughly `concurrency` entries however large the batch
            while let Some(result) = tasks.try_join_next() {
                reap(&stats, result);
            }
        }

        debug!(remaining = tasks.len(), "waiting for classifier tasks");

        while let Some(result) = tasks.join_next().await {
            reap(&stats, result);
        }

        // All tasks are done; dropping the last senders closes both channels.
        drop(finding_tx);
        drop(error_tx);

        let findings = findings.finish().await?;
        let errors = errors.finish().await?;

        let report = AuditReport::new(findings, errors);
        info!(
            dispatched = stats.dispatched(),
            skipped = stats.skipped(),
            matched = stats.matched(),
            mismatched = stats.mismatched(),
            decode_failed = stats.decode_failed(),
            fetch_failed = stats.fetch_failed(),
            reported = report.total_count(),
            "audit complete"
        );

        Ok(AuditRun { report, stats })
    }
}

/// Sends a record to its collector.
async fn route(tx: &mpsc::Sender<IconOutcome>, outcome: IconOutcome) {
    let id = outcome.id;
    if tx.send(outcome).await.is_err() {
        // Only possible if the collector task died; its failure surfaces at finish().
        warn!(id, "collector closed, record dropped");
    }
}

/// Accounts for one finished classifier task.
fn reap(stats: &AuditStats, result: Result<(), JoinError>) {
    if let Err(e) = result {
        warn!(error = %e, "classifier task panicked");
        stats.increment_panicked();
    }
}
