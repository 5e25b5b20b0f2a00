//! Single-threaded [`Map`] over `std::collections::HashMap`.
//!
//! This is the reference behaviour the concurrent map matches when it is
//! only used from one thread.

use std::collections::hash_map::RandomState;
use std::collections::HashMap as StdHashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FromIterator;

use crate::error::Error;
use crate::map::{Entry, Map};

pub struct HashMap<K, V, S = RandomState> {
    elements: StdHashMap<K, V, S>,
}

impl<K, V> HashMap<K, V, RandomState> {
    pub fn new() -> Self {
        Self {
            elements: StdHashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: StdHashMap::with_capacity(capacity),
        }
    }
}

impl<K, V, S> HashMap<K, V, S> {
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            elements: StdHashMap::with_hasher(hash_builder),
        }
    }
}

impl<K, V, S: Default> Default for HashMap<K, V, S> {
    fn default() -> Self {
        Self {
            elements: StdHashMap::default(),
        }
    }
}

impl<K, V, S> Map<K, V> for HashMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn put(&mut self, key: K, value: V) -> Option<V> {
        self.elements.insert(key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        self.elements.get(key).cloned()
    }

    fn remove(&mut self, key: &K) -> Result<V, Error> {
        self.elements.remove(key).ok_or(Error::KeyNotFound)
    }

    fn contains_key(&self, key: &K) -> bool {
        self.elements.contains_key(key)
    }

    fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.elements.values().any(|v| v == value)
    }

    fn size(&self) -> usize {
        self.elements.len()
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn keys(&self) -> Vec<K> {
        self.elements.keys().cloned().collect()
    }

    fn values(&self) -> Vec<V> {
        self.elements.values().cloned().collect()
    }

    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in &self.elements {
            f(key, value);
        }
    }

    fn find_entry<P>(&self, mut predicate: P) -> Option<Entry<K, V>>
    where
        P: FnMut(&K, &V) -> bool,
    {
        self.elements
            .iter()
            .find(|&(key, value)| predicate(key, value))
            .map(|(key, value)| Entry::new(key.clone(), value.clone()))
    }

    fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&K, &V) -> bool,
    {
        let mut elements = StdHashMap::with_hasher(self.elements.hasher().clone());
        for (key, value) in &self.elements {
            if predicate(key, value) {
                elements.insert(key.clone(), value.clone());
            }
        }
        Self { elements }
    }
}

impl<K, V, S> fmt::Debug for HashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.elements.iter()).finish()
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}
