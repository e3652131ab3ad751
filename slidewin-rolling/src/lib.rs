//! slidewin rolling counters
//!
//! Time-bucketed counters built on [`slidewin_core::WindowBuffer`]. A rolling
//! window of `window_ms` milliseconds is split into `bucket_count` buckets;
//! events are counted into the bucket covering "now" and old buckets fall out
//! of the window as time moves on.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use slidewin_core::time::ManualClock;
//! use slidewin_rolling::{CounterEvent, RollingCfg, RollingCounter};
//!
//! #[derive(Debug, Clone, Copy)]
//! enum Request {
//!     Success,
//!     Failure,
//! }
//!
//! impl CounterEvent for Request {
//!     fn all() -> &'static [Self] {
//!         &[Request::Success, Request::Failure]
//!     }
//!
//!     fn ordinal(self) -> usize {
//!         self as usize
//!     }
//! }
//!
//! let clock = Arc::new(ManualClock::new(0));
//! let counter = RollingCounter::<Request, _>::with_clock(
//!     RollingCfg::new(1_000, 10),
//!     Arc::clone(&clock),
//! )?;
//!
//! counter.increment(Request::Success);
//! clock.advance(500);
//! counter.increment(Request::Failure);
//!
//! assert_eq!(counter.rolling_sum(Request::Success), 1);
//! assert_eq!(counter.rolling_sum(Request::Failure), 1);
//!
//! // A full window later, both have rolled out
//! clock.advance(1_500);
//! assert_eq!(counter.rolling_sum(Request::Success), 0);
//! assert_eq!(counter.cumulative_sum(Request::Success), 1);
//! # Ok::<(), slidewin_core::WindowError>(())
//! ```

mod cells;
mod cfg;
mod counter;

// Public API exports
pub use cells::CounterCells;
pub use cfg::RollingCfg;
pub use counter::{CounterEvent, RollingCounter};

// Re-export error types from slidewin-core
pub use slidewin_core::{WindowError, WindowResult};
