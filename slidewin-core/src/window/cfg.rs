//! Window configuration types
//!
//! Defines the capacity and append policy for a [`WindowBuffer`](super::WindowBuffer).

use core::fmt;

use crate::{WindowError, WindowResult};

/// How `add_last` resolves a lost compare-and-swap race
///
/// # Quick Selection Guide
/// - **Any number of producers**: `RetryUntilSuccess` (no lost updates)
/// - **Exactly one producer thread**: `SingleProducer` (one CAS attempt, never loops)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AppendPolicy {
    /// Re-read the current state and retry until the append is published
    ///
    /// Every logical append is eventually reflected in the window.
    #[default]
    RetryUntilSuccess,

    /// Attempt the CAS once and drop the append if another writer won
    ///
    /// Only correct when callers guarantee at most one concurrent appender.
    /// A racing `clear()` can still cause the append to be dropped.
    SingleProducer,
}

impl AppendPolicy {
    /// Returns a stable, human-readable name for this policy
    pub fn name(&self) -> &'static str {
        match self {
            AppendPolicy::RetryUntilSuccess => "retry_until_success",
            AppendPolicy::SingleProducer => "single_producer",
        }
    }
}

impl fmt::Display for AppendPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for a window buffer
///
/// # Examples
/// ```rust
/// use slidewin_core::window::{AppendPolicy, WindowCfg};
///
/// let cfg = WindowCfg::new(10);
/// assert!(cfg.validate().is_ok());
///
/// let single = WindowCfg::new(10).with_policy(AppendPolicy::SingleProducer);
/// assert_eq!(single.policy, AppendPolicy::SingleProducer);
///
/// assert!(WindowCfg::new(0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowCfg {
    /// Maximum number of live buckets
    pub capacity: usize,

    /// Conflict resolution for `add_last`
    #[cfg_attr(feature = "serde", serde(default))]
    pub policy: AppendPolicy,
}

impl WindowCfg {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: AppendPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AppendPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates the configuration
    ///
    /// Returns `InvalidArgument` if capacity is 0.
    pub fn validate(&self) -> WindowResult<()> {
        if self.capacity == 0 {
            return Err(WindowError::invalid_argument(
                "capacity",
                "window capacity must be > 0",
            ));
        }
        // One spare slot separates a full window from an empty one
        if self.capacity.checked_add(1).is_none() {
            return Err(WindowError::invalid_argument(
                "capacity",
                format!("window capacity must be < {}", usize::MAX),
            ));
        }
        Ok(())
    }

    /// Returns estimated memory held by one published state
    ///
    /// Approximation: the slot array (`capacity + 1` pointers) plus the
    /// payloads of a full window. Readers pinning older states add to this.
    pub fn estimated_memory_bytes(&self, item_size: usize) -> usize {
        let slot_size = core::mem::size_of::<Option<super::Bucket<()>>>();
        let slots = self.capacity.saturating_add(1).saturating_mul(slot_size);
        // Arc header (two counters) + timestamp per live bucket
        let per_bucket = item_size + 2 * core::mem::size_of::<usize>() + 8;
        slots.saturating_add(self.capacity.saturating_mul(per_bucket))
    }
}

impl Default for WindowCfg {
    /// Returns the default configuration: capacity 10, retry until success
    fn default() -> Self {
        WindowCfg::new(10)
    }
}

impl fmt::Display for WindowCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WindowCfg(capacity={}, policy={})",
            self.capacity, self.policy
        )
    }
}
