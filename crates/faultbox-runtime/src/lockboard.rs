//! Shared lock that blocking scenarios contend on.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of [`LockBoard::hold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldOutcome {
    /// Cancelled before the hold completed.
    pub interrupted: bool,
    /// Time spent waiting for the lock.
    pub waited: Duration,
    /// Time the lock was actually held.
    pub held: Duration,
}

/// Point-in-time view of lock contention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockStatus {
    pub waiting: Vec<String>,
    pub holding: Vec<String>,
    pub lock_held: bool,
    pub queue_length: usize,
    pub has_queued: bool,
}

/// One fair async mutex plus registries of who waits for it and who holds it.
#[derive(Debug, Default)]
pub struct LockBoard {
    lock: tokio::sync::Mutex<()>,
    waiting: Mutex<BTreeSet<String>>,
    holding: Mutex<BTreeSet<String>>,
}

/// Removes a worker name from a registry when dropped.
struct Registration<'a> {
    set: &'a Mutex<BTreeSet<String>>,
    name: &'a str,
}

impl<'a> Registration<'a> {
    fn new(set: &'a Mutex<BTreeSet<String>>, name: &'a str) -> Self {
        set.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string());
        Self { set, name }
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(self.name);
    }
}

impl LockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the lock, then hold it for `duration` or until `cancel` fires.
    ///
    /// Waiters are served in FIFO order. The worker is removed from both
    /// registries on every exit path, including when the future is dropped.
    pub async fn hold(
        &self,
        worker: &str,
        duration: Duration,
        cancel: &CancellationToken,
    ) -> HoldOutcome {
        let wait_start = Instant::now();
        let waiting = Registration::new(&self.waiting, worker);
        debug!(worker, "Waiting for shared lock");

        let guard = tokio::select! {
            guard = self.lock.lock() => guard,
            () = cancel.cancelled() => {
                warn!(worker, "Interrupted while waiting for shared lock");
                return HoldOutcome {
                    interrupted: true,
                    waited: wait_start.elapsed(),
                    held: Duration::ZERO,
                };
            }
        };
        let waited = wait_start.elapsed();

        // Register as holder before leaving the waiting set so status never
        // shows the lock free while it is held
        let holding = Registration::new(&self.holding, worker);
        drop(waiting);
        info!(worker, waited = ?waited, "Acquired shared lock");

        let hold_start = Instant::now();
        let interrupted = tokio::select! {
            () = tokio::time::sleep(duration) => false,
            () = cancel.cancelled() => true,
        };
        let held = hold_start.elapsed();

        drop(holding);
        drop(guard);

        if interrupted {
            warn!(worker, held = ?held, "Lock hold interrupted");
        } else {
            info!(worker, held = ?held, "Released shared lock");
        }

        HoldOutcome {
            interrupted,
            waited,
            held,
        }
    }

    /// Current waiters and holders.
    pub fn status(&self) -> LockStatus {
        let holding: Vec<String> = self
            .holding
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        let waiting: Vec<String> = self
            .waiting
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();

        LockStatus {
            lock_held: !holding.is_empty(),
            queue_length: waiting.len(),
            has_queued: !waiting.is_empty(),
            waiting,
            holding,
        }
    }
}
