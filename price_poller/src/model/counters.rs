//! Successful request counters.
//!
//! `RequestCounters` holds the aggregate shared by every worker and read by the
//! periodic reporter. `WorkerCounter` belongs to a single worker: only its owner
//! can increment it (`&mut self`), while `CountReader` handles let other threads
//! read the value without tearing.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Aggregate counter shared across all workers.
#[derive(Debug, Default)]
pub struct RequestCounters {
    total: AtomicU64,
}

impl RequestCounters {
    /// Create a zeroed counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful request and return the new aggregate.
    pub fn increment_aggregate(&self) -> u64 {
        self.total.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current aggregate.
    pub fn aggregate(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }
}

/// Per-worker successful request counter.
#[derive(Debug, Default)]
pub struct WorkerCounter {
    requests: Arc<AtomicU64>,
}

impl WorkerCounter {
    /// Create a zeroed counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful request made by the owning worker.
    pub fn increment(&mut self) -> u64 {
        self.requests.fetch_add(1, Ordering::Release) + 1
    }

    /// Current value as seen by the owner.
    pub fn get(&self) -> u64 {
        self.requests.load(Ordering::Acquire)
    }

    /// Read-only handle usable from other threads.
    pub fn reader(&self) -> CountReader {
        CountReader {
            requests: Arc::clone(&self.requests),
        }
    }
}

/// Read-only view of a `WorkerCounter`.
#[derive(Debug, Clone)]
pub struct CountReader {
    requests: Arc<AtomicU64>,
}

impl CountReader {
    /// Current value.
    pub fn get(&self) -> u64 {
        self.requests.load(Ordering::Acquire)
    }
}
