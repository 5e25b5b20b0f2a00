//! Implementation of a lock-free, concurrent hash map.
//!
//! The map is a 256-radix tree of atomic bucket pointers. Each key is fed
//! through a sponge (a keyed hash re-seeded every eight bytes) and every
//! squeezed byte picks a bucket one level further down. Contrary to open
//! addressing, this approach needs no resizing and no locks: the only
//! synchronizing instruction is CAS, and retired buckets are reclaimed with
//! `crossbeam-epoch`.
//!
//! # Consistency
//!
//! - Single-key operations (`put`, `put_if_absent`, `get`, `remove`,
//!   `contains_key`) are linearizable. A `put` on an existing key swaps the
//!   value atomically, so the previous value it returns is exactly the one it
//!   displaced.
//! - Whole-map operations (`size`, `is_empty`, `keys`, `values`, `entries`,
//!   `for_each`, `contains_value`, `find_key`, `find_entry`, `filter`,
//!   `clear`) walk the tree while other threads keep mutating it. An entry
//!   inserted or removed during the walk may or may not be observed. Callers
//!   that need a consistent snapshot must synchronize externally.
//!
//! # Ownership
//!
//! Values are cloned on the way out. The only borrowed view is
//! [`ConcurrentMap::lookup`], which is tied to an epoch guard and is
//! read-only.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FromIterator;
use std::marker::PhantomData;

use crossbeam_epoch::{self as epoch, Guard};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::Error;
use crate::map::{Entry, Map};
use crate::sponge::Sponge;
use crate::table::Table;

/// A lock-free, concurrent hash map.
pub struct ConcurrentMap<K, V, S = RandomState> {
    /// The root table of the hash map.
    root: Table<K, V>,
    hash_builder: S,
}

impl<K, V> ConcurrentMap<K, V, RandomState>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V, S> Default for ConcurrentMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> ConcurrentMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Creates an empty map that hashes keys with `hash_builder`.
    ///
    /// The hasher must mix its input well: keys are told apart by the bytes
    /// of their hashes, and keys whose hash streams never separate end up
    /// sharing a slower collision bucket.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            root: Table::default(),
            hash_builder,
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Lookups a key, borrowing the value for as long as `guard` is pinned.
    pub fn lookup<'g, Q>(&'g self, key: &Q, guard: &'g Guard) -> Option<&'g V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut sponge = Sponge::new(key, &self.hash_builder);
        self.root
            .lookup(key, &mut sponge, guard)
            .map(|entry| &entry.value)
    }

    /// Returns a clone of the value stored for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let guard = &epoch::pin();
        self.lookup(key, guard).cloned()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let guard = &epoch::pin();
        self.lookup(key, guard).is_some()
    }

    /// Insert a key with a certain value into the map.
    ///
    /// - Returns `Some(previous)` if `key` was already occupied; the old
    ///   value is replaced in one atomic step.
    /// - Returns `None` if `key` was unoccupied.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let guard = &epoch::pin();
        self.root.insert(key, value, true, &self.hash_builder, guard)
    }

    /// Insert only if `key` is unoccupied.
    ///
    /// Returns `None` if the pair was inserted, or `Some(existing)` (leaving
    /// the map untouched) otherwise.
    pub fn put_if_absent(&self, key: K, value: V) -> Option<V> {
        let guard = &epoch::pin();
        self.root.insert(key, value, false, &self.hash_builder, guard)
    }

    /// Remove a key from the map, returning its value.
    pub fn remove<Q>(&self, key: &Q) -> Result<V, Error>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let guard = &epoch::pin();
        let mut sponge = Sponge::new(key, &self.hash_builder);
        self.root
            .remove(key, &mut sponge, guard)
            .ok_or(Error::KeyNotFound)
    }

    /// Walks every entry until `f` returns `false`. Returns whether the walk
    /// completed.
    fn visit<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&K, &V) -> bool,
    {
        let guard = &epoch::pin();
        self.root.visit(guard, &mut f)
    }

    /// Calls `f` on every entry.
    ///
    /// No lock is held while `f` runs, so `f` may call back into the map;
    /// the thread stays pinned, which only delays memory reclamation.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        self.visit(|key, value| {
            f(key, value);
            true
        });
    }

    /// Counts the entries. This walks the whole tree.
    pub fn size(&self) -> usize {
        let mut count = 0;
        self.for_each(|_, _| count += 1);
        count
    }

    pub fn is_empty(&self) -> bool {
        self.visit(|_, _| false)
    }

    /// Removes all entries.
    pub fn clear(&self) {
        let guard = &epoch::pin();
        self.root.clear(guard);
        debug!("cleared concurrent map");
    }

    pub fn keys(&self) -> Vec<K> {
        let mut keys = Vec::new();
        self.for_each(|key, _| keys.push(key.clone()));
        keys
    }

    pub fn values(&self) -> Vec<V> {
        let mut values = Vec::new();
        self.for_each(|_, value| values.push(value.clone()));
        values
    }

    pub fn entries(&self) -> Vec<Entry<K, V>> {
        let mut entries = Vec::new();
        self.for_each(|key, value| entries.push(Entry::new(key.clone(), value.clone())));
        entries
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        !self.visit(|_, v| v != value)
    }

    /// The first key found mapping to `value`.
    pub fn find_key(&self, value: &V) -> Option<K>
    where
        V: PartialEq,
    {
        self.find_entry(|_, v| v == value).map(|entry| entry.key)
    }

    /// The first entry found matching `predicate`.
    pub fn find_entry<P>(&self, mut predicate: P) -> Option<Entry<K, V>>
    where
        P: FnMut(&K, &V) -> bool,
    {
        let mut found = None;
        self.visit(|key, value| {
            if predicate(key, value) {
                found = Some(Entry::new(key.clone(), value.clone()));
                return false;
            }
            true
        });
        found
    }

    /// Builds a new map from the entries matching `predicate`.
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&K, &V) -> bool,
        S: Clone,
    {
        let filtered = Self::with_hasher(self.hash_builder.clone());
        self.for_each(|key, value| {
            if predicate(key, value) {
                filtered.put(key.clone(), value.clone());
            }
        });
        filtered
    }
}

impl<K, V, S> Map<K, V> for ConcurrentMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn put(&mut self, key: K, value: V) -> Option<V> {
        ConcurrentMap::put(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        ConcurrentMap::get(self, key)
    }

    fn remove(&mut self, key: &K) -> Result<V, Error> {
        ConcurrentMap::remove(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        ConcurrentMap::contains_key(self, key)
    }

    fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        ConcurrentMap::contains_value(self, value)
    }

    fn size(&self) -> usize {
        ConcurrentMap::size(self)
    }

    fn is_empty(&self) -> bool {
        ConcurrentMap::is_empty(self)
    }

    fn clear(&mut self) {
        ConcurrentMap::clear(self)
    }

    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&K, &V),
    {
        ConcurrentMap::for_each(self, f)
    }

    fn find_entry<P>(&self, predicate: P) -> Option<Entry<K, V>>
    where
        P: FnMut(&K, &V) -> bool,
    {
        ConcurrentMap::find_entry(self, predicate)
    }

    fn filter<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&K, &V) -> bool,
    {
        ConcurrentMap::filter(self, predicate)
    }
}

impl<K, V, S> fmt::Debug for ConcurrentMap<K, V, S>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: Clone + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = &epoch::pin();
        let mut map = f.debug_map();
        self.root.visit(guard, &mut |key, value| {
            map.entry(key, value);
            true
        });
        map.finish()
    }
}

impl<K, V, S> FromIterator<(K, V)> for ConcurrentMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = Self::default();
        for (key, value) in iter {
            map.put(key, value);
        }
        map
    }
}

impl<K, V, S> Extend<(K, V)> for ConcurrentMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            ConcurrentMap::put(self, key, value);
        }
    }
}

impl<K, V, S> Serialize for ConcurrentMap<K, V, S>
where
    K: Hash + Eq + Clone + Serialize,
    V: Clone + Serialize,
    S: BuildHasher,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for entry in &entries {
            map.serialize_entry(&entry.key, &entry.value)?;
        }
        map.end()
    }
}

impl<'de, K, V, S> Deserialize<'de> for ConcurrentMap<K, V, S>
where
    K: Hash + Eq + Clone + Deserialize<'de>,
    V: Clone + Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor<K, V, S>(PhantomData<fn() -> ConcurrentMap<K, V, S>>);

        impl<'de, K, V, S> Visitor<'de> for MapVisitor<K, V, S>
        where
            K: Hash + Eq + Clone + Deserialize<'de>,
            V: Clone + Deserialize<'de>,
            S: BuildHasher + Default,
        {
            type Value = ConcurrentMap<K, V, S>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let map = ConcurrentMap::default();
                while let Some((key, value)) = access.next_entry()? {
                    map.put(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::Hasher;

    /// Hashes every key to the same stream, forcing collision buckets.
    #[derive(Clone, Default)]
    struct Constant;

    struct ConstantHasher;

    impl Hasher for ConstantHasher {
        fn finish(&self) -> u64 {
            0x5a5a_5a5a
        }

        fn write(&mut self, _: &[u8]) {}
    }

    impl BuildHasher for Constant {
        type Hasher = ConstantHasher;

        fn build_hasher(&self) -> ConstantHasher {
            ConstantHasher
        }
    }

    #[test]
    fn put_get_remove() {
        let map = ConcurrentMap::new();
        assert_eq!(map.put("a", 1), None);
        assert_eq!(map.put("a", 2), Some(1));
        assert_eq!(map.get(&"a"), Some(2));
        assert_eq!(map.remove(&"a"), Ok(2));
        assert_eq!(map.remove(&"a"), Err(Error::KeyNotFound));
        assert_eq!(map.get(&"a"), None);
    }

    #[test]
    fn put_if_absent_keeps_existing() {
        let map = ConcurrentMap::new();
        assert_eq!(map.put_if_absent(1, "one"), None);
        assert_eq!(map.put_if_absent(1, "uno"), Some("one"));
        assert_eq!(map.get(&1), Some("one"));
    }

    #[test]
    fn colliding_keys() {
        let map = ConcurrentMap::with_hasher(Constant);
        for i in 0..20 {
            assert_eq!(map.put(i, i * 10), None);
        }
        assert_eq!(map.size(), 20);
        assert_eq!(map.put(7, 0), Some(70));
        assert_eq!(map.put_if_absent(7, 1), Some(0));
        for i in 0..20 {
            assert!(map.remove(&i).is_ok());
        }
        assert!(map.is_empty());
        assert_eq!(map.put(3, 3), None);
        assert_eq!(map.get(&3), Some(3));
    }

    #[test]
    fn replace_in_collision_bucket_keeps_other_keys() {
        let map = ConcurrentMap::with_hasher(Constant);
        for i in 0..4 {
            map.put(i, format!("v{}", i));
        }
        assert_eq!(map.put(2, "new".to_string()), Some("v2".to_string()));
        assert_eq!(map.put_if_absent(2, "ignored".to_string()), Some("new".to_string()));
        assert_eq!(map.size(), 4);
        for i in [0, 1, 3] {
            assert_eq!(map.get(&i), Some(format!("v{}", i)));
        }
        let guard = &epoch::pin();
        assert_eq!(map.lookup(&2, guard).map(String::as_str), Some("new"));
    }

    #[test]
    fn borrowed_lookup() {
        let map = ConcurrentMap::new();
        map.put("key".to_string(), vec![1, 2, 3]);
        let guard = &epoch::pin();
        assert_eq!(map.lookup("key", guard), Some(&vec![1, 2, 3]));
        assert!(map.contains_key("key"));
    }

    #[test]
    fn debug_lists_entries() {
        let map = ConcurrentMap::new();
        map.put(1, "x");
        assert_eq!(format!("{:?}", map), "{1: \"x\"}");
    }
}
