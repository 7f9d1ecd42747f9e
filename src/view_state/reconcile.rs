//! List reconciliation: bring a rendered child list in line with a target
//! sequence using as few structural operations as possible.
//!
//! Windowed rendering re-derives the visible slice on every scroll tick.
//! Most of that slice is usually already on screen in the right order, so
//! rebuilding it would thrash the surface. Instead the reconciler keeps the
//! longest run of nodes that are already in relative order (the longest
//! increasing subsequence of their prior positions) and only inserts or
//! moves the rest.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// An ordered surface of rendered nodes addressed by identity.
///
/// Implemented by anything that can hold a child list: a retained-mode UI
/// tree, a terminal list widget, or the plain [`ListSurface`].
pub trait RenderSurface {
    /// Node identity. Keys are unique within the surface.
    type Key: Copy + Eq + Hash;

    /// Current children, in order.
    fn children(&self) -> Vec<Self::Key>;

    /// Place `key` immediately before `anchor`, or at the end if `anchor` is
    /// `None`. A key already on the surface is moved, not duplicated.
    fn insert_before(&mut self, key: Self::Key, anchor: Option<Self::Key>);

    /// Remove `key` from the surface. Unknown keys are ignored.
    fn remove(&mut self, key: Self::Key);
}

/// Structural operations performed by one [`reconcile`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileStats {
    /// Nodes that were not on the surface before.
    pub inserted: usize,
    /// Existing nodes that had to change position.
    pub moved: usize,
    /// Nodes no longer present in the target.
    pub removed: usize,
}

impl ReconcileStats {
    /// Inserts plus moves.
    pub fn placements(&self) -> usize {
        self.inserted + self.moved
    }
}

/// Mutate `surface` so its children equal `next`.
///
/// Keys in `next` must be unique. Nodes on the longest increasing
/// subsequence of prior positions are never touched, so
/// `placements() == next.len() - lis_len`.
pub fn reconcile<S: RenderSurface>(surface: &mut S, next: &[S::Key]) -> ReconcileStats {
    let old = surface.children();
    let old_index: HashMap<S::Key, usize> =
        old.iter().enumerate().map(|(i, key)| (*key, i)).collect();

    let prior: Vec<Option<usize>> = next.iter().map(|key| old_index.get(key).copied()).collect();
    let stable = stable_positions(&prior);

    let mut stats = ReconcileStats::default();
    let mut anchor = None;
    for i in (0..next.len()).rev() {
        let key = next[i];
        match prior[i] {
            None => {
                surface.insert_before(key, anchor);
                stats.inserted += 1;
            }
            Some(_) if !stable[i] => {
                surface.insert_before(key, anchor);
                stats.moved += 1;
            }
            Some(_) => {}
        }
        anchor = Some(key);
    }

    let keep: HashSet<S::Key> = next.iter().copied().collect();
    for key in old {
        if !keep.contains(&key) {
            surface.remove(key);
            stats.removed += 1;
        }
    }

    stats
}

/// Mark the positions of `prior` that belong to one longest strictly
/// increasing subsequence. `None` (new nodes) never belongs to it.
///
/// Patience sorting with binary search over pile tails, O(n log n). The
/// tails alone are not a valid subsequence, so each element remembers the
/// tail it was stacked on and the result is recovered by walking back from
/// the last pile.
fn stable_positions(prior: &[Option<usize>]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut predecessor: Vec<Option<usize>> = vec![None; prior.len()];

    for (i, position) in prior.iter().enumerate() {
        let Some(position) = *position else {
            continue;
        };
        let slot = tails.partition_point(|&t| prior[t].is_some_and(|p| p < position));
        if slot > 0 {
            predecessor[i] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(i);
        } else {
            tails[slot] = i;
        }
    }

    let mut stable = vec![false; prior.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        stable[i] = true;
        cursor = predecessor[i];
    }
    stable
}

/// Length of the longest increasing subsequence of `next`'s positions in
/// `old`, ignoring keys absent from `old`.
pub fn lis_len<K: Copy + Eq + Hash>(old: &[K], next: &[K]) -> usize {
    let old_index: HashMap<K, usize> = old.iter().enumerate().map(|(i, k)| (*k, i)).collect();
    let prior: Vec<Option<usize>> = next.iter().map(|k| old_index.get(k).copied()).collect();
    stable_positions(&prior).into_iter().filter(|s| *s).count()
}

/// `Vec`-backed surface.
///
/// Used by the overlay as its rendered child list; the terminal front end
/// draws whatever keys it holds, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSurface<K> {
    keys: Vec<K>,
}

impl<K> Default for ListSurface<K> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<K: Copy + Eq + Hash> ListSurface<K> {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface already holding `keys`.
    pub fn from_keys(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Rendered keys, in order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Number of rendered nodes.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing is rendered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

impl<K: Copy + Eq + Hash> RenderSurface for ListSurface<K> {
    type Key = K;

    fn children(&self) -> Vec<K> {
        self.keys.clone()
    }

    fn insert_before(&mut self, key: K, anchor: Option<K>) {
        if let Some(existing) = self.keys.iter().position(|k| *k == key) {
            self.keys.remove(existing);
        }
        let at = anchor
            .and_then(|a| self.keys.iter().position(|k| *k == a))
            .unwrap_or(self.keys.len());
        self.keys.insert(at, key);
    }

    fn remove(&mut self, key: K) {
        self.keys.retain(|k| *k != key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Surface that records every operation, to check which nodes were touched.
    #[derive(Default)]
    struct Recording {
        inner: ListSurface<u32>,
        touched: Vec<u32>,
    }

    impl RenderSurface for Recording {
        type Key = u32;

        fn children(&self) -> Vec<u32> {
            self.inner.children()
        }

        fn insert_before(&mut self, key: u32, anchor: Option<u32>) {
            self.touched.push(key);
            self.inner.insert_before(key, anchor);
        }

        fn remove(&mut self, key: u32) {
            self.inner.remove(key);
        }
    }

    fn recording(keys: &[u32]) -> Recording {
        Recording {
            inner: ListSurface::from_keys(keys.iter().copied()),
            touched: Vec::new(),
        }
    }

    #[test]
    fn empty_surface_inserts_everything_in_order() {
        let mut surface = ListSurface::new();
        let stats = reconcile(&mut surface, &[1, 2, 3]);
        assert_eq!(surface.keys(), &[1, 2, 3]);
        assert_eq!(stats.inserted, 3);
        assert_eq!(stats.moved, 0);
    }

    #[test]
    fn identical_sequence_is_untouched() {
        let mut surface = recording(&[1, 2, 3]);
        let stats = reconcile(&mut surface, &[1, 2, 3]);
        assert_eq!(stats, ReconcileStats::default());
        assert!(surface.touched.is_empty());
    }

    #[test]
    fn scrolling_down_only_inserts_new_tail_and_removes_head() {
        let mut surface = recording(&[1, 2, 3, 4]);
        let stats = reconcile(&mut surface, &[3, 4, 5, 6]);
        assert_eq!(surface.inner.keys(), &[3, 4, 5, 6]);
        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.moved, 0);
        assert_eq!(stats.removed, 2);
        assert_eq!(surface.touched, vec![6, 5]);
    }

    #[test]
    fn single_move_to_front() {
        let mut surface = recording(&[1, 2, 3, 4]);
        let stats = reconcile(&mut surface, &[4, 1, 2, 3]);
        assert_eq!(surface.inner.keys(), &[4, 1, 2, 3]);
        assert_eq!(stats.moved, 1);
        assert_eq!(surface.touched, vec![4]);
    }

    #[test]
    fn reversal_keeps_one_node() {
        let mut surface = ListSurface::from_keys([1, 2, 3, 4]);
        let stats = reconcile(&mut surface, &[4, 3, 2, 1]);
        assert_eq!(surface.keys(), &[4, 3, 2, 1]);
        assert_eq!(stats.moved, 3);
    }

    #[test]
    fn pile_tails_are_not_mistaken_for_the_subsequence() {
        // Prior positions [2, 3, 0]: the pile tails end up as {idx 2, idx 1},
        // which is not increasing. Only walking predecessors gives [2, 3].
        let mut surface = ListSurface::from_keys([30, 99, 10, 20]);
        let stats = reconcile(&mut surface, &[10, 20, 30]);
        assert_eq!(surface.keys(), &[10, 20, 30]);
        assert_eq!(stats.moved, 1);
        assert_eq!(stats.removed, 1);
    }

    #[test]
    fn emptying_removes_all() {
        let mut surface = ListSurface::from_keys([1, 2]);
        let stats = reconcile(&mut surface, &[]);
        assert!(surface.is_empty());
        assert_eq!(stats.removed, 2);
    }

    #[test]
    fn lis_len_ignores_new_keys() {
        assert_eq!(lis_len(&[1, 2, 3], &[9, 1, 8, 3]), 2);
        assert_eq!(lis_len::<u32>(&[], &[1, 2]), 0);
    }

    #[test]
    fn list_surface_insert_before_moves_existing_key() {
        let mut surface = ListSurface::from_keys([1, 2, 3]);
        surface.insert_before(3, Some(1));
        assert_eq!(surface.keys(), &[3, 1, 2]);
        surface.insert_before(3, None);
        assert_eq!(surface.keys(), &[1, 2, 3]);
    }
}
