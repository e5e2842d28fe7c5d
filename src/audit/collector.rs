//! Single-writer collector task.
//!
//! A [`Collector`] owns one routing channel's receiving end and is the only
//! code that ever touches its container, so no locking is needed. Records
//! are kept in arrival order, which depends on network timing and is not the
//! reporting order.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::AuditError;

/// Capacity of each routing channel. Tokio has no zero-capacity channel; one
/// slot keeps senders waiting on the collector almost like a rendezvous.
pub const ROUTING_CHANNEL_CAPACITY: usize = 1;

/// Handle to a running collector task.
#[derive(Debug)]
pub struct Collector<T> {
    name: &'static str,
    handle: JoinHandle<Vec<T>>,
}

impl<T: Send + 'static> Collector<T> {
    /// Spawns a collector and returns the sender feeding it.
    ///
    /// The collector drains until every clone of the returned sender has
    /// been dropped.
    #[must_use]
    pub fn spawn(name: &'static str) -> (mpsc::Sender<T>, Self) {
        let (tx, mut rx) = mpsc::channel(ROUTING_CHANNEL_CAPACITY);
        let handle = tokio::spawn(async move {
            let mut items = Vec::new();
            while let Some(item) = rx.recv().await {
                items.push(item);
            }
            debug!(collector = name, collected = items.len(), "collector drained");
            items
        });
        (tx, Self { name, handle })
    }

    /// Waits for the collector to drain and returns its records.
    ///
    /// Must only be awaited after all senders are dropped, otherwise it waits
    /// forever.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::CollectorFailed`] if the collector task panicked
    /// or was cancelled.
    pub async fn finish(self) -> Result<Vec<T>, AuditError> {
        self.handle
            .await
            .map_err(|source| AuditError::CollectorFailed {
                name: self.name,
                source,
            })
    }
}
