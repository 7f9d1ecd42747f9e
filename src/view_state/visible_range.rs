//! Visible range calculation result

use std::ops::Range;

/// Range of entries to render, as indices into the group-filtered entry list.
///
/// Half-open: `start` is rendered, `end` is not.
///
/// # Invariants
/// - `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    /// Index of first rendered entry (inclusive).
    pub start: usize,
    /// Index past the last rendered entry (exclusive).
    pub end: usize,
}

impl VisibleRange {
    /// Create new visible range.
    ///
    /// # Panics
    /// In debug builds, panics if start > end.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "start {} > end {}", start, end);
        Self { start, end }
    }

    /// Empty range.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rendered entries.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if range is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Iterate over rendered indices.
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Check if a specific index is rendered.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Inclusive last index, if any.
    pub fn last(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end - 1)
    }
}
