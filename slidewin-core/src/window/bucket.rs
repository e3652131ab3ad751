//! Timestamped window entries

use core::fmt;
use std::sync::Arc;

use crate::time::Timestamp;

/// An immutable, timestamped payload entry held in a window
///
/// The payload lives behind an `Arc`, so cloning a bucket is a reference
/// count bump and does not require `T: Clone`. Payloads that need to be
/// updated while their bucket is live (counters, histograms) use interior
/// mutability inside `T`; the bucket itself never changes.
pub struct Bucket<T> {
    window_start: Timestamp,
    payload: Arc<T>,
}

impl<T> Bucket<T> {
    pub fn new(window_start: Timestamp, payload: T) -> Self {
        Self {
            window_start,
            payload: Arc::new(payload),
        }
    }

    /// Builds a bucket around an already shared payload
    pub fn from_arc(window_start: Timestamp, payload: Arc<T>) -> Self {
        Self {
            window_start,
            payload,
        }
    }

    /// Start of the time window this bucket covers
    pub fn window_start(&self) -> Timestamp {
        self.window_start
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn payload_arc(&self) -> &Arc<T> {
        &self.payload
    }

    /// Returns true if both handles have the same window start and share
    /// one payload allocation
    pub fn ptr_eq(&self, other: &Bucket<T>) -> bool {
        self.window_start == other.window_start && Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl<T> Clone for Bucket<T> {
    fn clone(&self) -> Self {
        Self {
            window_start: self.window_start,
            payload: Arc::clone(&self.payload),
        }
    }
}

impl<T: PartialEq> PartialEq for Bucket<T> {
    fn eq(&self, other: &Self) -> bool {
        self.window_start == other.window_start && *self.payload == *other.payload
    }
}

impl<T: Eq> Eq for Bucket<T> {}

impl<T: fmt::Debug> fmt::Debug for Bucket<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket")
            .field("window_start", &self.window_start)
            .field("payload", &*self.payload)
            .finish()
    }
}
