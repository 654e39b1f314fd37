//! Lock-free run progress counters.
//!
//! Shared between the worker tasks (which bump counters) and the progress
//! reporter (which polls them). Relaxed ordering is fine: the numbers feed
//! a progress bar, not control flow.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for a single run.
#[derive(Debug, Default)]
pub struct Progress {
    total: AtomicUsize,
    completed: AtomicUsize,
    failed_fetches: AtomicUsize,
}

impl Progress {
    /// Creates a zeroed progress tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total number of detail URLs once discovery finishes.
    pub fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
    }

    /// Marks one detail URL as fully joined.
    pub fn mark_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one failed fetch (any stage).
    pub fn mark_failed_fetch(&self) {
        self.failed_fetches.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn failed_fetches(&self) -> usize {
        self.failed_fetches.load(Ordering::Relaxed)
    }
}
