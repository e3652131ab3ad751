//! Lock-free bounded sliding window
//!
//! A window is a fixed-capacity FIFO of time-ordered [`Bucket`]s shared
//! between producer threads (appending) and reader threads (inspecting).
//! Nothing here blocks: writers use an optimistic read-compute-CAS loop and
//! readers perform a single atomic load.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  WindowBuffer (facade)                       │
//! │  add_last / size / peek_last / clear /       │
//! │  iterate → WindowSnapshot                    │
//! └───────────────────┬──────────────────────────┘
//!                     │
//!                     ▼
//! ┌──────────────────────────────────────────────┐
//! │  AtomicStateHolder                           │
//! │  ArcSwap<WindowState>, CAS retry loops       │
//! └───────────────────┬──────────────────────────┘
//!                     │ publishes
//!                     ▼
//! ┌──────────────────────────────────────────────┐
//! │  WindowState (immutable)                     │
//! │  slots[capacity + 1], head, tail             │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Append policies
//!
//! - **RetryUntilSuccess** (default): a writer that loses a CAS race retries
//!   against the winner's state. No append is ever lost.
//! - **SingleProducer**: one CAS attempt; on conflict the append is dropped.
//!   Only valid when at most one thread appends at a time.
//!
//! # Ordering
//!
//! - Appends from one thread are observed in that thread's program order.
//! - Every snapshot is a state that was installed at some instant; it never
//!   mixes two states.

mod bucket;
mod buffer;
mod cfg;
mod holder;
mod state;

// Public API exports
pub use bucket::Bucket;
pub use buffer::{IntoIter, WindowBuffer, WindowSnapshot};
pub use cfg::{AppendPolicy, WindowCfg};
pub use holder::AtomicStateHolder;
pub use state::{Iter, WindowState};
