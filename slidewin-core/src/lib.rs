//! slidewin core
//!
//! A lock-free, fixed-capacity circular buffer of timestamped buckets with
//! atomic immutable-state transitions. Producers append without locks,
//! readers observe consistent snapshots without blocking, and the oldest
//! bucket is evicted once capacity is exceeded.

pub mod metrics;
pub mod time;
pub mod window;
mod error;

// Public API exports
pub use error::{WindowError, WindowResult};
pub use metrics::{StatsSnapshot, WindowStats};
pub use time::{SystemClock, Timestamp, TimestampProvider};
pub use window::{AppendPolicy, Bucket, WindowBuffer, WindowCfg, WindowSnapshot, WindowState};
