//! Per-bucket atomic counter cells

use core::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// One atomic cell per event ordinal
///
/// Lives inside an immutable bucket; the cells themselves are updated in
/// place by concurrent writers.
pub struct CounterCells {
    cells: Box<[AtomicI64]>,
}

impl CounterCells {
    pub fn new(len: usize) -> Self {
        Self {
            cells: (0..len).map(|_| AtomicI64::new(0)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds `value` to the cell, wrapping on overflow
    pub fn add(&self, ordinal: usize, value: i64) {
        self.cells[ordinal].fetch_add(value, Ordering::Relaxed);
    }

    /// Raises the cell to `value` if it is currently lower
    pub fn update_max(&self, ordinal: usize, value: i64) {
        self.cells[ordinal].fetch_max(value, Ordering::Relaxed);
    }

    pub fn get(&self, ordinal: usize) -> i64 {
        self.cells[ordinal].load(Ordering::Relaxed)
    }
}

impl fmt::Debug for CounterCells {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.cells.iter().map(|c| c.load(Ordering::Relaxed)))
            .finish()
    }
}
