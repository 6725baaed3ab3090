//! Metrics registry for sheetdb
//!
//! - Counters only
//! - Monotonic increase
//! - Shared between a database and its table views

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters
///
/// All counters use atomic operations with Relaxed ordering.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Header rows read from the grid
    header_refreshes: AtomicU64,
    /// Records appended
    records_inserted: AtomicU64,
    /// Records returned by select
    records_returned: AtomicU64,
    /// Rows rewritten by update
    records_updated: AtomicU64,
    /// Rows removed by delete
    records_deleted: AtomicU64,
    /// Requests that failed validation
    queries_rejected: AtomicU64,
    /// Worksheets created
    tables_created: AtomicU64,
    /// Worksheets removed
    tables_dropped: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_header_refreshes(&self) {
        self.header_refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_records_inserted(&self) {
        self.records_inserted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_records_returned(&self, count: u64) {
        self.records_returned.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_records_updated(&self) {
        self.records_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_records_deleted(&self) {
        self.records_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_tables_created(&self) {
        self.tables_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_tables_dropped(&self) {
        self.tables_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            header_refreshes: self.header_refreshes.load(Ordering::Relaxed),
            records_inserted: self.records_inserted.load(Ordering::Relaxed),
            records_returned: self.records_returned.load(Ordering::Relaxed),
            records_updated: self.records_updated.load(Ordering::Relaxed),
            records_deleted: self.records_deleted.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            tables_created: self.tables_created.load(Ordering::Relaxed),
            tables_dropped: self.tables_dropped.load(Ordering::Relaxed),
        }
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or(serde_json::Value::Null)
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub header_refreshes: u64,
    pub records_inserted: u64,
    pub records_returned: u64,
    pub records_updated: u64,
    pub records_deleted: u64,
    pub queries_rejected: u64,
    pub tables_created: u64,
    pub tables_dropped: u64,
}
