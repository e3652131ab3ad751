//! Compare-and-swap engine for window state
//!
//! Holds the current [`WindowState`] behind an [`ArcSwap`]. Writers read the
//! installed state, compute a successor with a pure transition and try to
//! swap it in; readers perform a single atomic load and never retry.
//!
//! A CAS succeeds only if the installed pointer still equals the one the
//! writer started from. The writer keeps its `Arc` to that state alive for
//! the whole attempt, so the allocation cannot be freed and reused in the
//! meantime (no ABA).

use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

use super::{Bucket, WindowState};
use crate::metrics::WindowStats;

/// Owns the single published [`WindowState`] of a buffer
pub struct AtomicStateHolder<T> {
    state: ArcSwap<WindowState<T>>,
    capacity: usize,
    stats: WindowStats,
}

impl<T> AtomicStateHolder<T> {
    /// Creates a holder with an empty state
    pub fn new(capacity: usize) -> Self {
        Self {
            state: ArcSwap::from_pointee(WindowState::empty(capacity)),
            capacity,
            stats: WindowStats::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> &WindowStats {
        &self.stats
    }

    /// Loads the installed state (one atomic load, never retries)
    pub fn snapshot(&self) -> Arc<WindowState<T>> {
        self.state.load_full()
    }

    /// Appends `bucket`, retrying until the append is published
    ///
    /// Each lost race re-reads the state that beat us and recomputes the
    /// transition from it, so no append is ever lost.
    pub fn append(&self, bucket: Bucket<T>) {
        let mut current = self.state.load_full();
        loop {
            let (next, evicted) = current.with_appended(bucket.clone());
            match self.publish(&current, next) {
                Ok(()) => {
                    self.stats.record_append(evicted.is_some());
                    return;
                }
                Err(observed) => {
                    self.stats.record_conflict();
                    #[cfg(feature = "tracing")]
                    tracing::trace!(
                        size = observed.size(),
                        "window append lost CAS race, retrying"
                    );
                    current = observed;
                }
            }
        }
    }

    /// Attempts the append once; drops it if another writer got there first
    ///
    /// This is the single-producer fast path. Returns `true` if the bucket
    /// was published.
    pub fn try_append(&self, bucket: Bucket<T>) -> bool {
        let current = self.state.load_full();
        if self.compare_and_append(&current, bucket) {
            return true;
        }

        self.stats.record_drop();
        #[cfg(feature = "tracing")]
        tracing::debug!("single-producer append dropped after CAS conflict");
        false
    }

    /// Appends `bucket` only if `expected` is still the installed state
    ///
    /// Lets a producer decide whether to append based on what it observed
    /// (e.g. "only if the newest bucket is still the one I looked at").
    pub fn compare_and_append(&self, expected: &Arc<WindowState<T>>, bucket: Bucket<T>) -> bool {
        let (next, evicted) = expected.with_appended(bucket);
        match self.publish(expected, next) {
            Ok(()) => {
                self.stats.record_append(evicted.is_some());
                true
            }
            Err(_) => {
                self.stats.record_conflict();
                false
            }
        }
    }

    /// Replaces `expected` with a state holding only `bucket`
    pub fn compare_and_reset(&self, expected: &Arc<WindowState<T>>, bucket: Bucket<T>) -> bool {
        let next = WindowState::with_single(self.capacity, bucket);
        match self.publish(expected, next) {
            Ok(()) => {
                self.stats.record_clear();
                self.stats.record_append(false);
                true
            }
            Err(_) => {
                self.stats.record_conflict();
                false
            }
        }
    }

    /// Installs an empty state only if `expected` is still the installed state
    ///
    /// A caller that needs to act on exactly the buckets it removed can
    /// inspect `expected` after a successful call.
    pub fn compare_and_clear(&self, expected: &Arc<WindowState<T>>) -> bool {
        match self.publish(expected, WindowState::empty(self.capacity)) {
            Ok(()) => {
                self.stats.record_clear();
                true
            }
            Err(_) => {
                self.stats.record_conflict();
                false
            }
        }
    }

    /// Installs an empty state, retrying until the swap succeeds
    pub fn clear(&self) {
        let mut current = self.state.load_full();
        loop {
            match self.publish(&current, WindowState::empty(self.capacity)) {
                Ok(()) => {
                    self.stats.record_clear();
                    #[cfg(feature = "tracing")]
                    tracing::debug!(discarded = current.size(), "window cleared");
                    return;
                }
                Err(observed) => {
                    self.stats.record_conflict();
                    current = observed;
                }
            }
        }
    }

    /// Swaps `next` in if `current` is still installed
    ///
    /// On failure returns the state that is installed instead.
    fn publish(
        &self,
        current: &Arc<WindowState<T>>,
        next: WindowState<T>,
    ) -> Result<(), Arc<WindowState<T>>> {
        let previous = self.state.compare_and_swap(current, Arc::new(next));
        if Arc::ptr_eq(&*previous, current) {
            Ok(())
        } else {
            Err(Guard::into_inner(previous))
        }
    }
}
