//! Bounded pool of named request workers.
//!
//! Every HTTP request leases one worker slot for its whole lifetime.
//! When all slots are leased, further requests wait in FIFO order, which
//! is the condition the blocking scenarios are designed to produce.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Errors from leasing a worker.
#[derive(Debug, Error)]
pub enum WorkerPoolError {
    /// The pool was closed.
    #[error("worker pool is closed")]
    Closed,

    /// A permit was granted but no slot was free.
    #[error("worker pool slot bookkeeping is inconsistent")]
    NoFreeSlot,
}

/// Fixed-size pool of worker slots named `{prefix}-{n}`.
#[derive(Debug)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    free: Arc<Mutex<BTreeSet<usize>>>,
    max: usize,
    prefix: String,
}

impl WorkerPool {
    /// Create a pool with `max` slots numbered from 1.
    pub fn new(max: usize, prefix: impl Into<String>) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max)),
            free: Arc::new(Mutex::new((1..=max).collect())),
            max,
            prefix: prefix.into(),
        }
    }

    /// Wait for a free slot and lease it.
    ///
    /// The lowest free slot number is handed out first.
    pub async fn acquire(&self) -> Result<WorkerLease, WorkerPoolError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| WorkerPoolError::Closed)?;

        let slot = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_first()
            .ok_or(WorkerPoolError::NoFreeSlot)?;

        Ok(WorkerLease {
            slot,
            name: format!("{}-{}", self.prefix, slot),
            free: Arc::clone(&self.free),
            _permit: permit,
        })
    }

    /// Number of slots currently leased.
    pub fn active(&self) -> usize {
        self.max - self.semaphore.available_permits()
    }

    /// Total number of slots.
    pub const fn max(&self) -> usize {
        self.max
    }
}

/// A leased worker slot. Dropping it frees the slot.
#[derive(Debug)]
pub struct WorkerLease {
    slot: usize,
    name: String,
    free: Arc<Mutex<BTreeSet<usize>>>,
    // Dropped after `Drop::drop` has returned the slot
    _permit: OwnedSemaphorePermit,
}

impl WorkerLease {
    /// Worker name, e.g. `http-worker-3`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slot number, starting at 1.
    pub const fn slot(&self) -> usize {
        self.slot
    }
}

impl Drop for WorkerLease {
    fn drop(&mut self) {
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(self.slot);
    }
}
