//! Rolling window geometry

use core::fmt;

use slidewin_core::{WindowCfg, WindowError, WindowResult};

/// Length of a rolling window and how many buckets it is split into
///
/// # Examples
/// ```rust
/// use slidewin_rolling::RollingCfg;
///
/// let cfg = RollingCfg::new(10_000, 10);
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.bucket_width_ms(), 1_000);
///
/// // Buckets must divide the window evenly
/// assert!(RollingCfg::new(1_000, 3).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollingCfg {
    /// Total window length in milliseconds
    pub window_ms: u64,

    /// Number of buckets the window is divided into
    pub bucket_count: usize,
}

impl RollingCfg {
    pub fn new(window_ms: u64, bucket_count: usize) -> Self {
        Self {
            window_ms,
            bucket_count,
        }
    }

    /// Validates the window geometry
    ///
    /// Returns `InvalidArgument` if either value is 0 or the window does not
    /// divide evenly into buckets.
    pub fn validate(&self) -> WindowResult<()> {
        if self.window_ms == 0 {
            return Err(WindowError::invalid_argument(
                "window_ms",
                "rolling window length must be > 0",
            ));
        }
        if self.bucket_count == 0 {
            return Err(WindowError::invalid_argument(
                "bucket_count",
                "rolling window needs at least one bucket",
            ));
        }
        if self.window_ms % self.bucket_count as u64 != 0 {
            return Err(WindowError::invalid_argument(
                "bucket_count",
                format!(
                    "window of {}ms is not divisible into {} buckets",
                    self.window_ms, self.bucket_count
                ),
            ));
        }
        Ok(())
    }

    /// Width of one bucket in milliseconds
    pub fn bucket_width_ms(&self) -> u64 {
        self.window_ms / self.bucket_count as u64
    }

    /// Configuration of the underlying window buffer
    pub fn window_cfg(&self) -> WindowCfg {
        WindowCfg::new(self.bucket_count)
    }
}

impl Default for RollingCfg {
    /// Returns the default geometry: 10 seconds in 10 buckets
    fn default() -> Self {
        RollingCfg::new(10_000, 10)
    }
}

impl fmt::Display for RollingCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RollingCfg(window={}ms, buckets={})",
            self.window_ms, self.bucket_count
        )
    }
}
