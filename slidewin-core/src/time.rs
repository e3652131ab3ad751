//! Time and timestamp utilities
//!
//! Buckets are keyed by the start of the time window they cover. This module
//! provides the [`Timestamp`] value type and the [`TimestampProvider`] trait
//! producers use to decide when a new window begins.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(u64);

impl Timestamp {
    /// The Unix epoch
    pub const ZERO: Timestamp = Timestamp(0);

    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Adds `millis`, clamping at `u64::MAX`
    pub const fn saturating_add_millis(self, millis: u64) -> Self {
        Timestamp(self.0.saturating_add(millis))
    }

    /// Milliseconds elapsed from `earlier` to `self`, or 0 if `earlier` is later
    pub const fn saturating_sub(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Self {
        Timestamp(millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Source of the current time
///
/// Enables deterministic tests: production code uses [`SystemClock`],
/// tests drive a [`ManualClock`].
///
/// # Example
/// ```rust
/// use slidewin_core::time::{ManualClock, TimestampProvider};
///
/// let clock = ManualClock::new(1_000);
/// clock.advance(250);
/// assert_eq!(clock.now().as_millis(), 1_250);
/// ```
pub trait TimestampProvider: Send + Sync {
    /// Gets the current timestamp according to this provider
    fn now(&self) -> Timestamp;
}

impl<P: TimestampProvider + ?Sized> TimestampProvider for std::sync::Arc<P> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Wall clock backed by [`SystemTime`]
///
/// Times before the Unix epoch clamp to [`Timestamp::ZERO`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimestampProvider for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Timestamp(millis)
    }
}

/// Manually driven clock
///
/// Lock-free; share it between threads with `Arc`.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(start_millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    /// Moves the clock forward by `millis`
    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimestampProvider for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.millis.load(Ordering::SeqCst))
    }
}
