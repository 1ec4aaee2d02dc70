//! Visible line range reported after a recalculation.

use serde::Serialize;

/// Range of document lines currently materialized.
///
/// # Invariants
/// - `start <= end`
/// - every index in `start..end` has a render handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VisibleRange {
    /// First visible line (inclusive).
    pub start: usize,
    /// One past the last visible line (exclusive).
    pub end: usize,
}

impl VisibleRange {
    /// Create a new visible range.
    ///
    /// # Panics
    /// In debug builds, panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "start {start} > end {end}");
        Self { start, end }
    }

    /// Number of visible lines.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `line` is visible.
    pub fn contains(&self, line: usize) -> bool {
        (self.start..self.end).contains(&line)
    }

    /// Visible line indices in ascending order.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// `(first, last)` with both ends inclusive, or `None` when empty.
    pub fn inclusive(&self) -> Option<(usize, usize)> {
        (!self.is_empty()).then(|| (self.start, self.end - 1))
    }
}
