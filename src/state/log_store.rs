//! Append-only entry storage with stable IDs.

use crate::model::EntryId;

/// Ordered log history.
///
/// Entries are addressed by [`EntryId`]. IDs keep increasing across
/// `clear`, so a render surface still holding keys from before a clear can
/// never confuse them with new entries.
#[derive(Debug, Clone)]
pub struct LogStore<E> {
    entries: Vec<E>,
    first_id: u64,
}

impl<E> Default for LogStore<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            first_id: 0,
        }
    }
}

impl<E> LogStore<E> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// ID the next pushed entry will receive.
    pub fn next_id(&self) -> EntryId {
        EntryId::new(self.first_id + self.entries.len() as u64)
    }

    /// Append an entry and return its ID.
    pub fn push(&mut self, entry: E) -> EntryId {
        let id = self.next_id();
        self.entries.push(entry);
        id
    }

    fn slot(&self, id: EntryId) -> Option<usize> {
        let offset = id.get().checked_sub(self.first_id)?;
        let offset = usize::try_from(offset).ok()?;
        (offset < self.entries.len()).then_some(offset)
    }

    /// Look up an entry.
    pub fn get(&self, id: EntryId) -> Option<&E> {
        self.slot(id).map(|i| &self.entries[i])
    }

    /// Look up an entry mutably.
    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut E> {
        self.slot(id).map(|i| &mut self.entries[i])
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &E)> {
        let first = self.first_id;
        self.entries
            .iter()
            .enumerate()
            .map(move |(i, e)| (EntryId::new(first + i as u64), e))
    }

    /// Iterate entries mutably in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntryId, &mut E)> {
        let first = self.first_id;
        self.entries
            .iter_mut()
            .enumerate()
            .map(move |(i, e)| (EntryId::new(first + i as u64), e))
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. IDs continue from where they left off.
    pub fn clear(&mut self) {
        self.first_id += self.entries.len() as u64;
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_assigns_sequential_ids() {
        let mut store = LogStore::new();
        assert_eq!(store.push("a"), EntryId::new(0));
        assert_eq!(store.push("b"), EntryId::new(1));
        assert_eq!(store.get(EntryId::new(1)), Some(&"b"));
    }

    #[test]
    fn ids_survive_clear_without_reuse() {
        let mut store = LogStore::new();
        store.push("a");
        store.push("b");
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.get(EntryId::new(0)), None);
        assert_eq!(store.push("c"), EntryId::new(2));
        assert_eq!(store.get(EntryId::new(2)), Some(&"c"));
    }

    #[test]
    fn iter_yields_ids_in_insertion_order() {
        let mut store = LogStore::new();
        store.push(10);
        store.push(20);
        let ids: Vec<_> = store.iter().map(|(id, v)| (id.get(), *v)).collect();
        assert_eq!(ids, vec![(0, 10), (1, 20)]);
    }

    #[test]
    fn unknown_ids_return_none() {
        let mut store: LogStore<u8> = LogStore::new();
        assert!(store.get_mut(EntryId::new(5)).is_none());
    }
}
