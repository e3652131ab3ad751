//! Observability for window buffers
//!
//! Lock-free counters tracking appends, evictions and CAS contention,
//! enabling runtime inspection of how hard producers are racing.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics tracker for a single window buffer
///
/// All counters use `Relaxed` ordering: they are diagnostic totals, not
/// synchronization points, and may lag the buffer state by a few operations.
///
/// # Example
///
/// ```rust
/// use slidewin_core::{Bucket, Timestamp, WindowBuffer};
///
/// let buffer = WindowBuffer::new(2).unwrap();
/// for i in 0..3 {
///     buffer.add_last(Bucket::new(Timestamp::from_millis(i), i));
/// }
///
/// let stats = buffer.stats().snapshot();
/// assert_eq!(stats.appends, 3);
/// assert_eq!(stats.evictions, 1);
/// ```
#[derive(Debug, Default)]
pub struct WindowStats {
    /// Successfully published appends
    appends: AtomicU64,

    /// Buckets pushed out of a full window by an append
    evictions: AtomicU64,

    /// CAS attempts that lost a race and had to re-read the state
    cas_conflicts: AtomicU64,

    /// Appends abandoned by the single-producer fast path
    dropped_appends: AtomicU64,

    /// Successfully published clears and resets
    clears: AtomicU64,
}

/// Point-in-time copy of [`WindowStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    pub appends: u64,
    pub evictions: u64,
    pub cas_conflicts: u64,
    pub dropped_appends: u64,
    pub clears: u64,
}

impl WindowStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_append(&self, evicted: bool) {
        self.appends.fetch_add(1, Ordering::Relaxed);
        if evicted {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_conflict(&self) {
        self.cas_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_drop(&self) {
        self.dropped_appends.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    pub fn appends(&self) -> u64 {
        self.appends.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn cas_conflicts(&self) -> u64 {
        self.cas_conflicts.load(Ordering::Relaxed)
    }

    pub fn dropped_appends(&self) -> u64 {
        self.dropped_appends.load(Ordering::Relaxed)
    }

    pub fn clears(&self) -> u64 {
        self.clears.load(Ordering::Relaxed)
    }

    /// Copies all counters
    ///
    /// Each counter is read independently, so the copy is not an atomic
    /// cut across counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            appends: self.appends(),
            evictions: self.evictions(),
            cas_conflicts: self.cas_conflicts(),
            dropped_appends: self.dropped_appends(),
            clears: self.clears(),
        }
    }

    /// Resets all counters to zero
    pub fn reset(&self) {
        self.appends.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.cas_conflicts.store(0, Ordering::Relaxed);
        self.dropped_appends.store(0, Ordering::Relaxed);
        self.clears.store(0, Ordering::Relaxed);
    }
}
