use std::collections::BTreeMap;

/// Insertion-ordered queue whose items are toggle-selected independently.
///
/// Keys are assigned by the caller and must be unique; iteration follows
/// ascending key order, which is insertion order for monotonic ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableQueue<T> {
    entries: BTreeMap<u64, Entry<T>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<T> {
    item: T,
    selected: bool,
}

impl<T> Default for SelectableQueue<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> SelectableQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: u64, item: T) {
        self.entries.insert(
            key,
            Entry {
                item,
                selected: false,
            },
        );
    }

    pub fn remove(&mut self, key: u64) -> Option<T> {
        self.entries.remove(&key).map(|entry| entry.item)
    }

    pub fn get(&self, key: u64) -> Option<&T> {
        self.entries.get(&key).map(|entry| &entry.item)
    }

    /// Flips selection of `key`; returns the new state, or `None` for unknown keys.
    pub fn toggle(&mut self, key: u64) -> Option<bool> {
        self.entries.get_mut(&key).map(|entry| {
            entry.selected = !entry.selected;
            entry.selected
        })
    }

    pub fn has_selection(&self) -> bool {
        self.entries.values().any(|entry| entry.selected)
    }

    pub fn selected(&self) -> impl Iterator<Item = (u64, &T)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.selected)
            .map(|(key, entry)| (*key, &entry.item))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &T, bool)> {
        self.entries
            .iter()
            .map(|(key, entry)| (*key, &entry.item, entry.selected))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
