//! In-memory registry table.

use crate::key::Key;
use std::collections::HashMap;

/// The in-memory mapping from [`Key`] to value for one engine run.
///
/// The table also carries the dirty flag: set whenever its content no
/// longer matches the file it was loaded from, either because a mutation
/// happened or because corrupt rows were dropped while loading.
#[derive(Debug, Default)]
pub struct RegistryTable {
    entries: HashMap<Key, String>,
    dirty: bool,
}

impl RegistryTable {
    /// Creates an empty, clean table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the value stored for the key.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stores a value, returning the previous one.
    ///
    /// When the key is already present the stored key keeps the case it
    /// was first inserted with; only the value is replaced.
    pub fn put(&mut self, key: Key, value: String) -> Option<String> {
        self.entries.insert(key, value)
    }

    /// Iterates over all entries in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&Key, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the table must be written back.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the table as differing from its file.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Marks the table as matching its file.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
