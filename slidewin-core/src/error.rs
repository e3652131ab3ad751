//! Error handling for slidewin operations
//!
//! The window buffer itself is total: appends, reads and clears never fail.
//! The only fallible surface is construction and configuration validation,
//! so [`WindowError`] is deliberately small.
//!
//! # Error Code System
//!
//! Each error carries a numeric code so callers can classify failures
//! without string matching. Codes are grouped by category:
//!
//! - **Configuration** (0x4000-0x4FFF): invalid capacity, invalid rolling window geometry
//!
//! # Example
//!
//! ```rust
//! use slidewin_core::{WindowBuffer, WindowError};
//!
//! let err = WindowBuffer::<u32>::new(0).unwrap_err();
//! assert!(matches!(err, WindowError::InvalidArgument { .. }));
//! assert_eq!(err.error_category(), 0x4000);
//! ```

use thiserror::Error;

/// Error type for slidewin construction and configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// A constructor or configuration received a value outside its domain
    ///
    /// Raised for `capacity == 0` and for rolling windows whose length is
    /// not evenly divisible into buckets. No buffer is created.
    #[error("Invalid argument `{parameter}`: {reason}")]
    InvalidArgument {
        parameter: &'static str,
        reason: String,
    },
}

impl WindowError {
    /// Shorthand for [`WindowError::InvalidArgument`]
    pub fn invalid_argument<S: Into<String>>(parameter: &'static str, reason: S) -> Self {
        WindowError::InvalidArgument {
            parameter,
            reason: reason.into(),
        }
    }

    /// Returns the numeric error code
    ///
    /// ```rust
    /// use slidewin_core::WindowError;
    ///
    /// let err = WindowError::invalid_argument("capacity", "must be > 0");
    /// assert_eq!(err.error_code(), 0x4001);
    /// ```
    pub const fn error_code(&self) -> u32 {
        match self {
            // Configuration errors: 0x4000-0x4FFF
            WindowError::InvalidArgument { .. } => 0x4001,
        }
    }

    /// Returns the error category (`error_code() & 0xF000`)
    pub const fn error_category(&self) -> u32 {
        self.error_code() & 0xF000
    }

    /// Prepends context to the error's reason
    ///
    /// ```rust
    /// use slidewin_core::WindowError;
    ///
    /// let err = WindowError::invalid_argument("capacity", "must be > 0")
    ///     .with_context("building request-latency window");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid argument `capacity`: building request-latency window: must be > 0"
    /// );
    /// ```
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        match self {
            WindowError::InvalidArgument {
                parameter,
                mut reason,
            } => {
                let context = context.into();
                reason.insert_str(0, ": ");
                reason.insert_str(0, &context);
                WindowError::InvalidArgument { parameter, reason }
            }
        }
    }
}

/// Result type for slidewin operations
pub type WindowResult<T> = Result<T, WindowError>;
