//! Public window buffer facade and snapshot views

use core::fmt;
use core::iter::FusedIterator;
use std::sync::Arc;

use super::state::Iter;
use super::{AppendPolicy, AtomicStateHolder, Bucket, WindowCfg, WindowState};
use crate::metrics::WindowStats;
use crate::WindowResult;

/// Lock-free, fixed-capacity sliding window of buckets
///
/// Producers append with [`add_last`](Self::add_last); readers inspect the
/// window with [`size`](Self::size), [`peek_last`](Self::peek_last) and
/// [`iterate`](Self::iterate). No operation blocks and no reader ever sees
/// a half-applied update. Once the window is full each append evicts the
/// oldest bucket.
///
/// Cloning a `WindowBuffer` yields another handle to the same window.
///
/// # Example
///
/// ```rust
/// use slidewin_core::{Bucket, Timestamp, WindowBuffer};
///
/// let window = WindowBuffer::new(3)?;
/// for (ts, name) in [(0, "A"), (10, "B"), (20, "C"), (30, "D")] {
///     window.add_last(Bucket::new(Timestamp::from_millis(ts), name));
/// }
///
/// assert_eq!(window.size(), 3);
/// let names: Vec<_> = window.iterate().iter().map(|b| *b.payload()).collect();
/// assert_eq!(names, ["B", "C", "D"]);
/// assert_eq!(window.peek_last().map(|b| *b.payload()), Some("D"));
/// # Ok::<(), slidewin_core::WindowError>(())
/// ```
pub struct WindowBuffer<T> {
    inner: Arc<AtomicStateHolder<T>>,
    policy: AppendPolicy,
}

impl<T> WindowBuffer<T> {
    /// Creates an empty window holding at most `capacity` buckets
    ///
    /// # Errors
    /// `InvalidArgument` if `capacity == 0`.
    pub fn new(capacity: usize) -> WindowResult<Self> {
        Self::with_cfg(WindowCfg::new(capacity))
    }

    /// Creates an empty window from a configuration
    pub fn with_cfg(cfg: WindowCfg) -> WindowResult<Self> {
        cfg.validate()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            capacity = cfg.capacity,
            policy = cfg.policy.name(),
            "creating window buffer"
        );

        Ok(Self {
            inner: Arc::new(AtomicStateHolder::new(cfg.capacity)),
            policy: cfg.policy,
        })
    }

    /// Appends `bucket` as the newest entry, evicting the oldest if full
    ///
    /// Never fails. Under [`AppendPolicy::RetryUntilSuccess`] the append is
    /// always published; under [`AppendPolicy::SingleProducer`] it is
    /// dropped if a concurrent writer won the race.
    pub fn add_last(&self, bucket: Bucket<T>) {
        match self.policy {
            AppendPolicy::RetryUntilSuccess => self.inner.append(bucket),
            AppendPolicy::SingleProducer => {
                self.inner.try_append(bucket);
            }
        }
    }

    /// Single CAS attempt regardless of the configured policy
    ///
    /// Returns `true` if the bucket was published.
    pub fn try_add_last(&self, bucket: Bucket<T>) -> bool {
        self.inner.try_append(bucket)
    }

    /// Appends `bucket` only if `expected` is still the current window
    ///
    /// Returns `false` without side effects if any write happened since
    /// `expected` was taken.
    pub fn compare_and_add_last(&self, expected: &WindowSnapshot<T>, bucket: Bucket<T>) -> bool {
        self.inner.compare_and_append(&expected.state, bucket)
    }

    /// Replaces the window with one holding only `bucket`, if `expected` is current
    pub fn compare_and_reset(&self, expected: &WindowSnapshot<T>, bucket: Bucket<T>) -> bool {
        self.inner.compare_and_reset(&expected.state, bucket)
    }

    /// Number of live buckets
    pub fn size(&self) -> usize {
        self.inner.snapshot().size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.snapshot().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn policy(&self) -> AppendPolicy {
        self.policy
    }

    /// Newest bucket, or `None` if the window is empty
    pub fn peek_last(&self) -> Option<Bucket<T>> {
        self.inner.snapshot().tail_bucket().cloned()
    }

    /// Oldest bucket, or `None` if the window is empty
    pub fn peek_first(&self) -> Option<Bucket<T>> {
        self.inner.snapshot().head_bucket().cloned()
    }

    /// Removes every bucket
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Removes every bucket, if `expected` is still the current window
    ///
    /// On success `expected` holds exactly the buckets that were removed.
    pub fn compare_and_clear(&self, expected: &WindowSnapshot<T>) -> bool {
        self.inner.compare_and_clear(&expected.state)
    }

    /// Captures the window as it is right now
    ///
    /// The returned snapshot is immutable: later appends and clears are
    /// never visible through it.
    pub fn iterate(&self) -> WindowSnapshot<T> {
        WindowSnapshot {
            state: self.inner.snapshot(),
        }
    }

    /// Alias of [`iterate`](Self::iterate)
    pub fn snapshot(&self) -> WindowSnapshot<T> {
        self.iterate()
    }

    pub fn stats(&self) -> &WindowStats {
        self.inner.stats()
    }
}

impl<T> Clone for WindowBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            policy: self.policy,
        }
    }
}

impl<T> fmt::Debug for WindowBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowBuffer")
            .field("capacity", &self.capacity())
            .field("size", &self.size())
            .field("policy", &self.policy)
            .finish()
    }
}

/// One atomically captured window state
///
/// Iteration is lazy, finite and restartable: every call to
/// [`iter`](Self::iter) walks the same buckets, oldest first.
pub struct WindowSnapshot<T> {
    state: Arc<WindowState<T>>,
}

impl<T> WindowSnapshot<T> {
    pub fn iter(&self) -> Iter<'_, T> {
        self.state.iter()
    }

    pub fn len(&self) -> usize {
        self.state.size()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.state.capacity()
    }

    pub fn first(&self) -> Option<&Bucket<T>> {
        self.state.head_bucket()
    }

    pub fn last(&self) -> Option<&Bucket<T>> {
        self.state.tail_bucket()
    }

    pub fn get(&self, index: usize) -> Option<&Bucket<T>> {
        self.state.get(index)
    }

    pub fn to_vec(&self) -> Vec<Bucket<T>> {
        self.state.to_ordered_sequence()
    }

    /// The underlying immutable state
    pub fn state(&self) -> &Arc<WindowState<T>> {
        &self.state
    }

    /// Returns true if both snapshots captured the same published state
    pub fn same_state(&self, other: &WindowSnapshot<T>) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl<T> Clone for WindowSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for WindowSnapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a WindowSnapshot<T> {
    type Item = &'a Bucket<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for WindowSnapshot<T> {
    type Item = Bucket<T>;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let back = self.state.size();
        IntoIter {
            state: self.state,
            front: 0,
            back,
        }
    }
}

/// Owning FIFO iterator over a [`WindowSnapshot`]
///
/// Keeps the captured state alive and yields cloned bucket handles.
pub struct IntoIter<T> {
    state: Arc<WindowState<T>>,
    front: usize,
    back: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = Bucket<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let bucket = self.state.get(self.front).cloned();
        self.front += 1;
        bucket
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.state.get(self.back).cloned()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
