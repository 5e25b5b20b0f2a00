//! The capability contract shared by every map variant.

use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A key-value pair copied out of a map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Entry { key, value }
    }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Entry { key, value }
    }
}

impl<K, V> From<Entry<K, V>> for (K, V) {
    fn from(entry: Entry<K, V>) -> Self {
        (entry.key, entry.value)
    }
}

/// Basic operations for key-value storage.
///
/// Lookups hand out clones of the stored values. Snapshot operations
/// (`keys`, `values`, `entries`, `for_each`, `find_*`, `filter`) have no
/// defined order.
pub trait Map<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Stores a key-value pair. Returns `Some(previous)` if the key existed.
    fn put(&mut self, key: K, value: V) -> Option<V>;

    /// Returns the value for `key`, if any.
    fn get(&self, key: &K) -> Option<V>;

    /// Removes the entry for `key`, failing with [`Error::KeyNotFound`] when
    /// it is absent.
    fn remove(&mut self, key: &K) -> Result<V, Error>;

    fn contains_key(&self, key: &K) -> bool;

    /// Linear scan comparing values with `PartialEq`.
    fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.find_key(value).is_some()
    }

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Removes all entries.
    fn clear(&mut self);

    fn keys(&self) -> Vec<K> {
        let mut keys = Vec::new();
        self.for_each(|key, _| keys.push(key.clone()));
        keys
    }

    fn values(&self) -> Vec<V> {
        let mut values = Vec::new();
        self.for_each(|_, value| values.push(value.clone()));
        values
    }

    fn entries(&self) -> Vec<Entry<K, V>> {
        let mut entries = Vec::new();
        self.for_each(|key, value| entries.push(Entry::new(key.clone(), value.clone())));
        entries
    }

    /// Calls `f` for every entry.
    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&K, &V);

    /// The first key (in iteration order) mapping to `value`.
    fn find_key(&self, value: &V) -> Option<K>
    where
        V: PartialEq,
    {
        self.find_entry(|_, v| v == value).map(|entry| entry.key)
    }

    /// The first entry (in iteration order) matching `predicate`.
    fn find_entry<P>(&self, predicate: P) -> Option<Entry<K, V>>
    where
        P: FnMut(&K, &V) -> bool;

    /// A new map holding only the entries matching `predicate`. The receiver
    /// is left untouched.
    fn filter<P>(&self, predicate: P) -> Self
    where
        Self: Sized,
        P: FnMut(&K, &V) -> bool;
}
