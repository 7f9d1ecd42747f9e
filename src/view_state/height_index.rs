//! HeightIndex - O(log n) prefix sums over entry heights via a Fenwick tree
//!
//! The windower needs two queries per render: "which entry covers this
//! offset" and "where does entry i start". Both reduce to prefix sums over
//! the heights of the group-filtered entries.
//!
//! # Complexity
//!
//! - `push`: O(log n) amortized
//! - `set`: O(log n)
//! - `prefix_sum` / `offset_of`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `height_at`, `len`: O(1)

/// Cumulative heights of a sequence of entries.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage; its length is the capacity.
    tree: Vec<isize>,
    /// Raw heights, kept so the tree can be rebuilt when it grows.
    heights: Vec<usize>,
}

impl HeightIndex {
    /// Creates an empty index with room for `capacity` entries.
    ///
    /// ```
    /// # use devconsole::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Builds an index from a height sequence.
    ///
    /// ```
    /// # use devconsole::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([3, 4, 5]);
    /// assert_eq!(index.total(), 12);
    /// ```
    pub fn from_heights(heights: impl IntoIterator<Item = usize>) -> Self {
        let iter = heights.into_iter();
        let mut index = Self::new(iter.size_hint().0);
        for height in iter {
            index.push(height);
        }
        index
    }

    /// Sets the height at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, height: usize) {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let delta = height as isize - self.heights[index] as isize;
        self.heights[index] = height;
        if delta != 0 {
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Height of the entry at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn height_at(&self, index: usize) -> usize {
        self.heights[index]
    }

    /// Returns the cumulative height up to and including the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// ```
    /// # use devconsole::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([3, 4, 5]);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let sum = fenwick::array::prefix_sum(&self.tree, index);
        sum.max(0) as usize
    }

    /// Offset at which the entry at `index` starts (sum of all heights
    /// before it). `offset_of(len())` is the total.
    pub fn offset_of(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// Binary search for the first index where `prefix_sum(index) > value`.
    ///
    /// Returns `None` if `value >= total()` or the index is empty.
    ///
    /// ```
    /// # use devconsole::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10, 20, 15]);
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(100), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Total height of all entries.
    pub fn total(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.prefix_sum(self.len() - 1)
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Appends an entry with the given height.
    pub fn push(&mut self, height: usize) {
        let idx = self.heights.len();
        self.heights.push(height);

        if idx >= self.tree.len() {
            // Fenwick nodes past the old capacity cover ranges that include
            // existing entries, so growing means rebuilding.
            self.rebuild(self.tree.len().max(1) * 2);
        } else {
            fenwick::array::update(&mut self.tree, idx, height as isize);
        }
    }

    fn rebuild(&mut self, capacity: usize) {
        self.tree.clear();
        self.tree.resize(capacity, 0);
        for (i, &height) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, i, height as isize);
        }
    }

    /// Clears all entries, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.tree.iter_mut().for_each(|node| *node = 0);
        self.heights.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_index() {
        let index = HeightIndex::new(10);
        assert_eq!(index.len(), 0);
        assert_eq!(index.total(), 0);
        assert!(index.is_empty());
        assert_eq!(index.lower_bound(0), None);
    }

    #[test]
    fn test_set_updates_height() {
        let mut index = HeightIndex::from_heights([3, 4, 5]);
        index.set(1, 10);

        assert_eq!(index.prefix_sum(0), 3);
        assert_eq!(index.prefix_sum(1), 13);
        assert_eq!(index.prefix_sum(2), 18);
        assert_eq!(index.height_at(1), 10);
    }

    #[test]
    fn test_offset_of_is_exclusive_prefix() {
        let index = HeightIndex::from_heights([3, 4, 5]);
        assert_eq!(index.offset_of(0), 0);
        assert_eq!(index.offset_of(1), 3);
        assert_eq!(index.offset_of(2), 7);
        assert_eq!(index.offset_of(3), 12);
    }

    #[test]
    fn test_lower_bound_edge_cases() {
        let index = HeightIndex::from_heights([5, 5, 5]);
        assert_eq!(index.lower_bound(0), Some(0));
        assert_eq!(index.lower_bound(5), Some(1));
        assert_eq!(index.lower_bound(10), Some(2));
        assert_eq!(index.lower_bound(15), None);
    }

    #[test]
    fn test_growth_past_initial_capacity_keeps_sums() {
        let mut index = HeightIndex::new(1);
        for h in 1..=9 {
            index.push(h);
        }
        assert_eq!(index.total(), 45);
        assert_eq!(index.prefix_sum(4), 15);
    }

    #[test]
    fn test_clear_and_reuse() {
        let mut index = HeightIndex::from_heights([5, 3]);
        index.clear();
        assert!(index.is_empty());

        index.push(10);
        assert_eq!(index.total(), 10);
    }

    proptest! {
        #[test]
        fn prop_prefix_sum_is_cumulative(heights in prop::collection::vec(0usize..=100, 1..80)) {
            let mut index = HeightIndex::new(2);
            for &h in &heights {
                index.push(h);
            }

            let mut expected = 0;
            for (i, &h) in heights.iter().enumerate() {
                expected += h;
                prop_assert_eq!(index.prefix_sum(i), expected);
            }
        }

        #[test]
        fn prop_set_updates_height(
            heights in prop::collection::vec(1usize..=100, 1..50),
            update_index in 0usize..50,
            new_height in 0usize..=100
        ) {
            let mut index = HeightIndex::from_heights(heights.iter().copied());
            if update_index < index.len() {
                index.set(update_index, new_height);
                let actual = index.prefix_sum(update_index) - index.offset_of(update_index);
                prop_assert_eq!(actual, new_height);
            }
        }
    }
}
