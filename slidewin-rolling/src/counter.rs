//! Rolling counter over a lock-free bucket window
//!
//! Each bucket covers `bucket_width_ms` of wall time and holds one atomic
//! cell per event. Finding the bucket for "now" may require appending new
//! buckets; that is done with a compare-and-append against the observed
//! window, so when several threads cross a bucket boundary together exactly
//! one of them creates the new bucket and the others re-read and use it.

use core::fmt;
use core::marker::PhantomData;

use slidewin_core::time::TimestampProvider;
use slidewin_core::{Bucket, SystemClock, Timestamp, WindowBuffer, WindowResult};

use crate::{CounterCells, RollingCfg};

/// An event type that can be counted by a [`RollingCounter`]
///
/// Typically implemented by a fieldless enum.
pub trait CounterEvent: Copy + Send + Sync + 'static {
    /// Every event, in ordinal order
    fn all() -> &'static [Self];

    /// Index of this event's cell, in `0..all().len()`
    fn ordinal(self) -> usize;

    /// Whether this event tracks a maximum instead of a sum
    fn is_max_updater(self) -> bool {
        false
    }
}

/// Counts events in a sliding time window
///
/// Reads and writes first roll the window forward to the bucket covering
/// the current time, so expired buckets never contribute to results.
///
/// Increments racing with a bucket roll-over may land in the previous
/// bucket after it has been folded into the cumulative totals; they are
/// still counted by the rolling sums.
pub struct RollingCounter<E, C = SystemClock> {
    cfg: RollingCfg,
    clock: C,
    window: WindowBuffer<CounterCells>,
    cumulative: CounterCells,
    _event: PhantomData<fn(E)>,
}

impl<E: CounterEvent> RollingCounter<E, SystemClock> {
    /// Creates a counter driven by the system clock
    pub fn new(cfg: RollingCfg) -> WindowResult<Self> {
        Self::with_clock(cfg, SystemClock)
    }
}

impl<E: CounterEvent, C: TimestampProvider> RollingCounter<E, C> {
    /// Creates a counter driven by `clock`
    ///
    /// # Errors
    /// `InvalidArgument` if the window geometry is invalid.
    pub fn with_clock(cfg: RollingCfg, clock: C) -> WindowResult<Self> {
        cfg.validate()?;
        let window = WindowBuffer::with_cfg(cfg.window_cfg())?;

        Ok(Self {
            cfg,
            clock,
            window,
            cumulative: CounterCells::new(E::all().len()),
            _event: PhantomData,
        })
    }

    pub fn cfg(&self) -> &RollingCfg {
        &self.cfg
    }

    /// The underlying bucket window
    pub fn window(&self) -> &WindowBuffer<CounterCells> {
        &self.window
    }

    pub fn increment(&self, event: E) {
        self.add(event, 1);
    }

    pub fn add(&self, event: E, value: i64) {
        self.current_bucket().payload().add(event.ordinal(), value);
    }

    /// Raises the current bucket's value for `event` to at least `value`
    pub fn update_max(&self, event: E, value: i64) {
        self.current_bucket()
            .payload()
            .update_max(event.ordinal(), value);
    }

    /// Sum of `event` over every bucket in the window
    ///
    /// Wraps on overflow, like the cells themselves.
    pub fn rolling_sum(&self, event: E) -> i64 {
        self.current_bucket();
        self.window
            .iterate()
            .iter()
            .map(|b| b.payload().get(event.ordinal()))
            .fold(0, i64::wrapping_add)
    }

    /// Largest per-bucket value of `event` in the window, 0 if empty
    pub fn rolling_max(&self, event: E) -> i64 {
        self.current_bucket();
        self.window
            .iterate()
            .iter()
            .map(|b| b.payload().get(event.ordinal()))
            .max()
            .unwrap_or(0)
    }

    /// Value of `event` in the bucket covering now
    pub fn latest_value(&self, event: E) -> i64 {
        self.current_bucket().payload().get(event.ordinal())
    }

    /// Per-bucket values of `event`, oldest first
    pub fn values(&self, event: E) -> Vec<i64> {
        self.current_bucket();
        self.window
            .iterate()
            .iter()
            .map(|b| b.payload().get(event.ordinal()))
            .collect()
    }

    /// Total of `event` since creation, including buckets that rolled out
    ///
    /// For max updaters this is the largest value ever seen.
    pub fn cumulative_sum(&self, event: E) -> i64 {
        // Folded totals first: a bucket rolling out in between is then
        // missed rather than counted twice
        let folded = self.cumulative.get(event.ordinal());
        let latest = self.latest_value(event);
        if event.is_max_updater() {
            latest.max(folded)
        } else {
            folded.wrapping_add(latest)
        }
    }

    /// Drops every bucket, keeping their values in the cumulative totals
    ///
    /// Only the bucket that was latest when the window was cleared is
    /// folded; older ones were folded when they stopped being latest.
    pub fn reset(&self) {
        loop {
            let snapshot = self.window.snapshot();
            if self.window.compare_and_clear(&snapshot) {
                if let Some(last) = snapshot.last() {
                    self.fold(last.payload());
                }
                return;
            }
        }
    }

    /// Returns the bucket covering the current time, creating it if needed
    pub fn current_bucket(&self) -> Bucket<CounterCells> {
        let now = self.clock.now();
        let width = self.cfg.bucket_width_ms();

        loop {
            let snapshot = self.window.snapshot();

            let next_start = match snapshot.last() {
                None => now,
                Some(last) => {
                    let end = last.window_start().saturating_add_millis(width);
                    // Also covers a clock that went backwards
                    if now < end {
                        return last.clone();
                    }

                    if now.saturating_sub(end) > self.cfg.window_ms {
                        let fresh = self.new_bucket(now);
                        if self.window.compare_and_reset(&snapshot, fresh.clone()) {
                            self.fold(last.payload());
                            #[cfg(feature = "tracing")]
                            tracing::debug!(
                                last_start = %last.window_start(),
                                now = %now,
                                "rolling window idle longer than its length, reset"
                            );
                            return fresh;
                        }
                        continue;
                    }

                    end
                }
            };

            let fresh = self.new_bucket(next_start);
            if self.window.compare_and_add_last(&snapshot, fresh) {
                if let Some(previous) = snapshot.last() {
                    self.fold(previous.payload());
                }
                #[cfg(feature = "tracing")]
                tracing::trace!(start = %next_start, "rolled to new bucket");
            }
        }
    }

    fn new_bucket(&self, start: Timestamp) -> Bucket<CounterCells> {
        Bucket::new(start, CounterCells::new(E::all().len()))
    }

    /// Adds a bucket that is no longer the latest into the cumulative totals
    fn fold(&self, cells: &CounterCells) {
        for event in E::all() {
            let ordinal = event.ordinal();
            let value = cells.get(ordinal);
            if event.is_max_updater() {
                self.cumulative.update_max(ordinal, value);
            } else {
                self.cumulative.add(ordinal, value);
            }
        }
    }
}

impl<E, C> fmt::Debug for RollingCounter<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingCounter")
            .field("cfg", &self.cfg)
            .field("buckets", &self.window.size())
            .field("cumulative", &self.cumulative)
            .finish()
    }
}
