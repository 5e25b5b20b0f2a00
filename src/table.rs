//! The lock-free radix table behind [`ConcurrentMap`](crate::ConcurrentMap).
//!
//! Every table has 256 atomic bucket pointers. A bucket is either a leaf
//! holding one entry, a branch holding a nested table, or a collision bucket
//! holding every entry whose sponge streams agree up to
//! [`MAX_DEPTH`](crate::sponge::MAX_DEPTH). Buckets are immutable once
//! published; every mutation builds a replacement and installs it with a
//! single CAS on the slot, then retires the old bucket through the epoch
//! collector.

use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};
use std::sync::atomic::Ordering;

use arr_macro::arr;
use crossbeam_epoch::{self as epoch, Atomic, Guard, Owned, Shared};
use crossbeam_utils::Backoff;
use tracing::{debug, trace};

use crate::sponge::Sponge;

#[derive(Clone)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

pub enum Bucket<K, V> {
    Leaf(Entry<K, V>),
    Branch(Table<K, V>),
    Collision(Vec<Entry<K, V>>),
}

/// A table which constructs the radix tree.
pub struct Table<K, V> {
    /// The buckets in the table.
    buckets: [Atomic<Bucket<K, V>>; 256],
}

impl<K, V> Bucket<K, V> {
    /// Entries stored directly in this bucket. Empty for branches.
    fn entries(&self) -> &[Entry<K, V>] {
        match self {
            Bucket::Leaf(entry) => std::slice::from_ref(entry),
            Bucket::Collision(entries) => entries,
            Bucket::Branch(_) => &[],
        }
    }

    fn find<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries().iter().find(|entry| entry.key.borrow() == key)
    }

    fn from_entries(mut entries: Vec<Entry<K, V>>) -> Self {
        if entries.len() == 1 {
            Bucket::Leaf(entries.remove(0))
        } else {
            Bucket::Collision(entries)
        }
    }

    /// Frees a branch that lost its CAS without dropping the buckets it
    /// borrowed from the live tree. Only branches built by this thread are
    /// freed; everything else is unlinked and left alone.
    fn release(branch: Owned<Bucket<K, V>>) {
        let branch = branch.into_box();
        if let Bucket::Branch(table) = &*branch {
            // SAFETY: the branch was never published, so no other thread can
            // reach it.
            let guard = unsafe { epoch::unprotected() };
            for slot in table.buckets.iter() {
                let child = slot.swap(Shared::null(), Ordering::Relaxed, guard);
                if let Some(Bucket::Branch(_)) = unsafe { child.as_ref() } {
                    Bucket::release(unsafe { child.into_owned() });
                }
            }
        }
    }
}

impl<'g, K: 'g, V: 'g> Table<K, V> {
    /// Create a table containing two particular buckets.
    ///
    /// The two sponges must be at the same depth and must diverge before
    /// `MAX_DEPTH`.
    fn with_two_entries<S>(
        entry1: Shared<'g, Bucket<K, V>>,
        sponge1: &mut Sponge<'_, K, S>,
        entry2: Shared<'g, Bucket<K, V>>,
        sponge2: &mut Sponge<'_, K, S>,
    ) -> Self
    where
        K: Hash,
        S: BuildHasher,
    {
        let table = Table::default();

        let idx1 = sponge1.squeeze() as usize;
        let idx2 = sponge2.squeeze() as usize;

        if idx1 != idx2 {
            table.buckets[idx1].store(entry1, Ordering::Relaxed);
            table.buckets[idx2].store(entry2, Ordering::Relaxed);
        } else {
            // The two positions matched, so we must place another branch.
            table.buckets[idx1].store(
                Owned::new(Bucket::Branch(Table::with_two_entries(
                    entry1, sponge1, entry2, sponge2,
                ))),
                Ordering::Relaxed,
            );
        }

        table
    }

    /// Get the entry associated with some key, given its sponge.
    pub fn lookup<Q, S>(
        &'g self,
        key: &Q,
        sponge: &mut Sponge<'_, Q, S>,
        guard: &'g Guard,
    ) -> Option<&'g Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        S: BuildHasher,
    {
        let bucket = self.buckets[sponge.squeeze() as usize].load(Ordering::Acquire, guard);

        match unsafe { bucket.as_ref() } {
            None => None,
            // The bucket is a branch with another table, so we recurse and
            // look up in said sub-table.
            Some(Bucket::Branch(table)) => table.lookup(key, sponge, guard),
            Some(bucket) => bucket.find(key),
        }
    }

    /// Insert a key-value pair.
    ///
    /// - Returns `Some(previous)` if `key` was already present. The stored
    ///   value is swapped only when `replace` is set.
    /// - Returns `None` if the key was absent.
    pub fn insert<S>(&'g self, key: K, value: V, replace: bool, hash_builder: &S, guard: &'g Guard) -> Option<V>
    where
        K: Hash + Eq + Clone,
        V: Clone,
        S: BuildHasher,
    {
        let mut sponge = Sponge::new(&key, hash_builder);
        let leaf = Owned::new(Bucket::Leaf(Entry {
            key: key.clone(),
            value,
        }))
        .into_shared(guard);
        self.insert_leaf(leaf, &key, replace, &mut sponge, guard)
    }

    fn insert_leaf<S>(
        &'g self,
        leaf: Shared<'g, Bucket<K, V>>,
        key: &K,
        replace: bool,
        sponge: &mut Sponge<'_, K, S>,
        guard: &'g Guard,
    ) -> Option<V>
    where
        K: Hash + Eq + Clone,
        V: Clone,
        S: BuildHasher,
    {
        // SAFETY: `leaf` stays private to this thread until a CAS publishes it.
        let ours = unsafe { leaf.deref() }.entries();
        let slot = &self.buckets[sponge.squeeze() as usize];
        let backoff = Backoff::new();

        loop {
            let current = slot.load(Ordering::Acquire, guard);

            let bucket = match unsafe { current.as_ref() } {
                Some(Bucket::Branch(table)) => {
                    return table.insert_leaf(leaf, key, replace, sponge, guard);
                }
                Some(bucket) if !bucket.entries().is_empty() => bucket,
                // Empty slot (or a drained collision bucket): claim it.
                _ => {
                    if slot
                        .compare_exchange(current, leaf, Ordering::AcqRel, Ordering::Acquire, guard)
                        .is_ok()
                    {
                        if !current.is_null() {
                            unsafe { guard.defer_destroy(current) };
                        }
                        return None;
                    }
                    backoff.spin();
                    continue;
                }
            };

            if let Some(existing) = bucket.find(key) {
                if !replace {
                    // SAFETY: `leaf` never left this thread.
                    drop(unsafe { leaf.into_owned() });
                    return Some(existing.value.clone());
                }

                let swapped = match bucket {
                    Bucket::Leaf(_) => slot
                        .compare_exchange(current, leaf, Ordering::AcqRel, Ordering::Acquire, guard)
                        .is_ok(),
                    _ => {
                        let entries = bucket
                            .entries()
                            .iter()
                            .flat_map(|e| if e.key == *key { ours } else { std::slice::from_ref(e) })
                            .cloned()
                            .collect();
                        let swapped = slot
                            .compare_exchange(
                                current,
                                Owned::new(Bucket::Collision(entries)),
                                Ordering::AcqRel,
                                Ordering::Acquire,
                                guard,
                            )
                            .is_ok();
                        if swapped {
                            // The collision bucket holds a copy of the leaf.
                            drop(unsafe { leaf.into_owned() });
                        }
                        swapped
                    }
                };

                if swapped {
                    let previous = existing.value.clone();
                    unsafe { guard.defer_destroy(current) };
                    return Some(previous);
                }
                backoff.spin();
                continue;
            }

            // The slot holds other keys: push both down a level, or fall back
            // to a collision bucket when the hash streams never separate.
            let mut other = Sponge::new(&bucket.entries()[0].key, sponge.hash_builder());
            other.matching(sponge);

            if sponge.diverges_from(&other) {
                let mut mine = sponge.clone();
                let branch = Owned::new(Bucket::Branch(Table::with_two_entries(
                    leaf, &mut mine, current, &mut other,
                )));
                match slot.compare_exchange(current, branch, Ordering::AcqRel, Ordering::Acquire, guard) {
                    Ok(_) => {
                        trace!(depth = sponge.depth(), "split bucket into branch");
                        return None;
                    }
                    Err(err) => Bucket::release(err.new),
                }
            } else {
                let mut entries = bucket.entries().to_vec();
                entries.extend_from_slice(ours);
                let collision = Owned::new(Bucket::Collision(entries));
                if slot
                    .compare_exchange(current, collision, Ordering::AcqRel, Ordering::Acquire, guard)
                    .is_ok()
                {
                    debug!(depth = sponge.depth(), "hash streams never diverged, using a collision bucket");
                    unsafe {
                        guard.defer_destroy(current);
                        drop(leaf.into_owned());
                    }
                    return None;
                }
            }

            backoff.spin();
        }
    }

    /// Unlink the entry for `key` and return its value.
    pub fn remove<Q, S>(&'g self, key: &Q, sponge: &mut Sponge<'_, Q, S>, guard: &'g Guard) -> Option<V>
    where
        K: Borrow<Q> + Clone,
        V: Clone,
        Q: Hash + Eq + ?Sized,
        S: BuildHasher,
    {
        let slot = &self.buckets[sponge.squeeze() as usize];
        let backoff = Backoff::new();

        loop {
            let current = slot.load(Ordering::Acquire, guard);

            let removed = match unsafe { current.as_ref() } {
                None => return None,
                Some(Bucket::Branch(table)) => return table.remove(key, sponge, guard),
                Some(Bucket::Leaf(entry)) => {
                    if entry.key.borrow() != key {
                        return None;
                    }
                    slot.compare_exchange(current, Shared::null(), Ordering::AcqRel, Ordering::Acquire, guard)
                        .is_ok()
                        .then(|| entry.value.clone())
                }
                Some(bucket) => {
                    let found = bucket.find(key)?;
                    let rest = bucket
                        .entries()
                        .iter()
                        .filter(|e| e.key.borrow() != key)
                        .cloned()
                        .collect();
                    slot.compare_exchange(
                        current,
                        Owned::new(Bucket::from_entries(rest)),
                        Ordering::AcqRel,
                        Ordering::Acquire,
                        guard,
                    )
                    .is_ok()
                    .then(|| found.value.clone())
                }
            };

            if let Some(value) = removed {
                unsafe { guard.defer_destroy(current) };
                return Some(value);
            }
            backoff.spin();
        }
    }

    /// Calls `f` on every entry until it returns `false`.
    ///
    /// Returns `false` if the walk was cut short.
    pub fn visit<F>(&'g self, guard: &'g Guard, f: &mut F) -> bool
    where
        F: FnMut(&'g K, &'g V) -> bool,
    {
        for slot in self.buckets.iter() {
            let bucket = slot.load(Ordering::Acquire, guard);
            match unsafe { bucket.as_ref() } {
                None => {}
                Some(Bucket::Branch(table)) => {
                    if !table.visit(guard, f) {
                        return false;
                    }
                }
                Some(bucket) => {
                    for entry in bucket.entries() {
                        if !f(&entry.key, &entry.value) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// Detaches every root bucket and retires the subtrees.
    pub fn clear(&self, guard: &Guard) {
        for slot in self.buckets.iter() {
            let bucket = slot.swap(Shared::null(), Ordering::AcqRel, guard);
            if !bucket.is_null() {
                unsafe { guard.defer_destroy(bucket) };
            }
        }
    }
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            buckets: arr![Atomic::null(); 256],
        }
    }
}

impl<K, V> Drop for Table<K, V> {
    fn drop(&mut self) {
        // SAFETY: `&mut self` means no thread can still reach this table.
        let guard = unsafe { epoch::unprotected() };
        for slot in self.buckets.iter() {
            let bucket = slot.load(Ordering::Relaxed, guard);
            if !bucket.is_null() {
                drop(unsafe { bucket.into_owned() });
            }
        }
    }
}
