//! Counting admission gate bounding in-flight classifier invocations.
//!
//! [`ConcurrencyLimiter::acquire`] waits until fewer than `capacity` permits
//! are outstanding. The returned [`LimiterPermit`] releases its slot when
//! dropped, so a task that finishes (or panics) always frees its slot.
//!
//! # Example
//!
//! ```
//! use icon_audit::audit::ConcurrencyLimiter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let limiter = ConcurrencyLimiter::new(2)?;
//! let first = limiter.acquire().await?;
//! let _second = limiter.acquire().await?;
//! assert_eq!(limiter.available(), 0);
//! drop(first);
//! assert_eq!(limiter.available(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

use super::AuditError;
use crate::config::{ConfigError, MAX_CONCURRENCY, MIN_CONCURRENCY};

/// Fixed-capacity admission gate backed by a Tokio semaphore.
///
/// Cloning shares the same slots.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// Admitted slot; released on drop.
#[derive(Debug)]
pub struct LimiterPermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyLimiter {
    /// Creates a limiter with `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConcurrency`] if `capacity` is outside
    /// `MIN_CONCURRENCY..=MAX_CONCURRENCY`.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&capacity) {
            return Err(ConfigError::InvalidConcurrency { value: capacity });
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    /// Waits for a free slot.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::LimiterClosed`] if the underlying semaphore was
    /// closed. The limiter never closes it itself.
    pub async fn acquire(&self) -> Result<LimiterPermit, AuditError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| AuditError::LimiterClosed)?;
        trace!(available = self.available(), "limiter slot acquired");
        Ok(LimiterPermit { _permit: permit })
    }

    /// Returns the configured number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of currently free slots.
    #[must_use]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
