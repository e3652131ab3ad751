//! Immutable window state and its pure transitions
//!
//! A [`WindowState`] is a complete, self-consistent picture of the window:
//! a slot array plus `head`/`tail` indices. It is never mutated after
//! construction. Every transition builds a new value, which the
//! [`AtomicStateHolder`](super::AtomicStateHolder) publishes with a single
//! compare-and-swap.
//!
//! # Index invariant
//!
//! The slot array has `data_length = capacity + 1` entries. The spare slot
//! distinguishes empty from full without a separate counter:
//!
//! ```text
//! empty:  head == tail
//! full:   (tail + 1) % data_length == head
//! size:   (tail + data_length - head) % data_length
//! ```
//!
//! Live buckets occupy `[head, tail)` with wraparound. Slots outside that
//! range are always `None`: eviction takes the bucket out of the new array
//! and `empty` starts with every slot cleared.
//!
//! # Storage discipline
//!
//! Transitions are copy-on-write. The new state receives its own slot array
//! (each copied slot is an `Arc` bump on the bucket payload), so no slot
//! reachable from a previously published state is ever written. Readers that
//! pinned an old state keep seeing exactly what it held, no matter how many
//! appends or clears happen afterwards.

use core::fmt;
use core::iter::FusedIterator;

use super::Bucket;

/// Immutable snapshot of the live buckets in a window
pub struct WindowState<T> {
    slots: Box<[Option<Bucket<T>>]>,
    head: usize,
    tail: usize,
}

impl<T> WindowState<T> {
    /// Creates an empty state able to hold `capacity` buckets
    ///
    /// A zero capacity is accepted here and yields a window that evicts
    /// every append immediately; [`WindowBuffer`](super::WindowBuffer)
    /// rejects it before a state is ever built.
    pub fn empty(capacity: usize) -> Self {
        let slots = (0..capacity + 1).map(|_| None).collect();
        Self {
            slots,
            head: 0,
            tail: 0,
        }
    }

    /// Creates a state holding only `bucket`
    pub fn with_single(capacity: usize, bucket: Bucket<T>) -> Self {
        Self::empty(capacity).with_appended(bucket).0
    }

    /// Returns the state after appending `bucket`, plus the evicted bucket
    ///
    /// If the window is full the oldest bucket is evicted (FIFO) and
    /// returned so callers can account for it.
    pub fn with_appended(&self, bucket: Bucket<T>) -> (WindowState<T>, Option<Bucket<T>>) {
        let data_length = self.data_length();
        let mut slots = self.slots.clone();

        if self.capacity() == 0 {
            return (
                WindowState {
                    slots,
                    head: self.head,
                    tail: self.tail,
                },
                Some(bucket),
            );
        }

        let (head, evicted) = if self.is_full() {
            (
                (self.head + 1) % data_length,
                slots[self.head].take(),
            )
        } else {
            (self.head, None)
        };

        slots[self.tail] = Some(bucket);

        let next = WindowState {
            slots,
            head,
            tail: (self.tail + 1) % data_length,
        };
        (next, evicted)
    }

    /// Maximum number of live buckets
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Length of the backing slot array (`capacity + 1`)
    pub fn data_length(&self) -> usize {
        self.slots.len()
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Number of live buckets
    pub fn size(&self) -> usize {
        let data_length = self.data_length();
        (self.tail + data_length - self.head) % data_length
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn is_full(&self) -> bool {
        self.size() == self.capacity()
    }

    /// Newest bucket, or `None` if empty
    pub fn tail_bucket(&self) -> Option<&Bucket<T>> {
        if self.is_empty() {
            return None;
        }
        let data_length = self.data_length();
        self.slots[(self.tail + data_length - 1) % data_length].as_ref()
    }

    /// Oldest bucket, or `None` if empty
    pub fn head_bucket(&self) -> Option<&Bucket<T>> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    /// Bucket at logical position `index`, counting from the oldest
    pub fn get(&self, index: usize) -> Option<&Bucket<T>> {
        if index >= self.size() {
            return None;
        }
        self.slots[(self.head + index) % self.data_length()].as_ref()
    }

    /// Iterates the live buckets, oldest first
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            state: self,
            front: 0,
            back: self.size(),
        }
    }

    /// Copies the live buckets into a vector, oldest first
    pub fn to_ordered_sequence(&self) -> Vec<Bucket<T>> {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for WindowState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowState")
            .field("capacity", &self.capacity())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("buckets", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a WindowState<T> {
    type Item = &'a Bucket<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing FIFO iterator over a [`WindowState`]
pub struct Iter<'a, T> {
    state: &'a WindowState<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Bucket<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let bucket = self.state.get(self.front);
        self.front += 1;
        bucket
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.state.get(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            state: self.state,
            front: self.front,
            back: self.back,
        }
    }
}
