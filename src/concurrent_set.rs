//! A lock-free set backed by [`ConcurrentMap`].
//!
//! Membership changes are linearizable per element. Whole-set operations
//! share the map's relaxed snapshot semantics.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FromIterator;

use crate::concurrent_map::ConcurrentMap;
use crate::error::Error;
use crate::set::Set;

pub struct ConcurrentSet<T, S = RandomState> {
    map: ConcurrentMap<T, (), S>,
}

impl<T> ConcurrentSet<T, RandomState>
where
    T: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Self {
            map: ConcurrentMap::new(),
        }
    }
}

impl<T, S> Default for ConcurrentSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self {
            map: ConcurrentMap::default(),
        }
    }
}

impl<T, S> ConcurrentSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher,
{
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            map: ConcurrentMap::with_hasher(hash_builder),
        }
    }

    /// Adds `element`. Returns `false` if it was already present.
    pub fn add(&self, element: T) -> bool {
        self.map.put_if_absent(element, ()).is_none()
    }

    pub fn remove<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(element).is_ok()
    }

    pub fn try_remove(&self, element: &T) -> Result<T, Error> {
        self.map
            .remove(element)
            .map(|()| element.clone())
            .map_err(|_| Error::ElementNotFound)
    }

    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(element)
    }

    pub fn size(&self) -> usize {
        self.map.size()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&self) {
        self.map.clear();
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.map.keys()
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        self.map.for_each(|element, _| f(element));
    }

    pub fn find<P>(&self, mut predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.map
            .find_entry(|element, _| predicate(element))
            .map(|entry| entry.key)
    }

    pub fn get_any(&self) -> Option<T> {
        self.find(|_| true)
    }

    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
        S: Clone,
    {
        Self {
            map: self.map.filter(|element, _| predicate(element)),
        }
    }

    pub fn union(&self, other: &Self) -> Self
    where
        S: Clone,
    {
        let union = self.filter(|_| true);
        other.for_each(|element| {
            union.add(element.clone());
        });
        union
    }

    pub fn intersection(&self, other: &Self) -> Self
    where
        S: Clone,
    {
        self.filter(|element| other.contains(element))
    }

    pub fn difference(&self, other: &Self) -> Self
    where
        S: Clone,
    {
        self.filter(|element| !other.contains(element))
    }

    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.find(|element| !other.contains(element)).is_none()
    }

    pub fn is_superset_of(&self, other: &Self) -> bool {
        other.is_subset_of(self)
    }
}

impl<T, S> Set<T> for ConcurrentSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    fn add(&mut self, element: T) -> bool {
        ConcurrentSet::add(self, element)
    }

    fn remove(&mut self, element: &T) -> bool {
        ConcurrentSet::remove(self, element)
    }

    fn try_remove(&mut self, element: &T) -> Result<T, Error> {
        ConcurrentSet::try_remove(self, element)
    }

    fn contains(&self, element: &T) -> bool {
        ConcurrentSet::contains(self, element)
    }

    fn size(&self) -> usize {
        ConcurrentSet::size(self)
    }

    fn is_empty(&self) -> bool {
        ConcurrentSet::is_empty(self)
    }

    fn clear(&mut self) {
        ConcurrentSet::clear(self)
    }

    fn to_vec(&self) -> Vec<T> {
        ConcurrentSet::to_vec(self)
    }

    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        ConcurrentSet::for_each(self, f)
    }

    fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        ConcurrentSet::find(self, predicate)
    }

    fn filter<P>(&self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        ConcurrentSet::filter(self, predicate)
    }

    fn union(&self, other: &Self) -> Self {
        ConcurrentSet::union(self, other)
    }
}

impl<T, S> fmt::Debug for ConcurrentSet<T, S>
where
    T: Hash + Eq + Clone + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        self.for_each(|element| {
            set.entry(element);
        });
        set.finish()
    }
}

impl<T, S> FromIterator<T> for ConcurrentSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let set = Self::default();
        for element in iter {
            set.add(element);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn add_remove_contains() {
        let set = ConcurrentSet::new();
        assert!(set.add("x".to_string()));
        assert!(!set.add("x".to_string()));
        assert!(set.contains("x"));
        assert_eq!(set.try_remove(&"x".to_string()), Ok("x".to_string()));
        assert_eq!(
            set.try_remove(&"x".to_string()),
            Err(Error::ElementNotFound)
        );
        assert!(!set.remove("x"));
        assert!(set.is_empty());
    }

    #[test]
    fn algebra() {
        let a: ConcurrentSet<i32> = (1..=4).collect();
        let b: ConcurrentSet<i32> = (3..=5).collect();
        assert_eq!(a.union(&b).to_vec().into_iter().sorted().collect_vec(), vec![1, 2, 3, 4, 5]);
        assert_eq!(a.intersection(&b).to_vec().into_iter().sorted().collect_vec(), vec![3, 4]);
        assert_eq!(a.difference(&b).to_vec().into_iter().sorted().collect_vec(), vec![1, 2]);
        assert!(a.intersection(&b).is_subset_of(&a));
        assert!(a.is_superset_of(&a.difference(&b)));
        assert!(!a.is_subset_of(&b));
        assert_eq!(a.size(), 4);
    }

    #[test]
    fn concurrent_adds_are_counted_once() {
        let set = Arc::new(ConcurrentSet::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let set = Arc::clone(&set);
                thread::spawn(move || (0..500).filter(|&i| set.add(i)).count())
            })
            .collect();
        let added: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(added, 500);
        assert_eq!(set.size(), 500);
    }
}
