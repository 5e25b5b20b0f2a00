//! Single-threaded [`Set`] over `std::collections::HashSet`.

use std::collections::hash_map::RandomState;
use std::collections::HashSet as StdHashSet;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FromIterator;

use crate::set::Set;

pub struct HashSet<T, S = RandomState> {
    elements: StdHashSet<T, S>,
}

impl<T> HashSet<T, RandomState> {
    pub fn new() -> Self {
        Self {
            elements: StdHashSet::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: StdHashSet::with_capacity(capacity),
        }
    }
}

impl<T, S> HashSet<T, S> {
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            elements: StdHashSet::with_hasher(hash_builder),
        }
    }
}

impl<T, S: Default> Default for HashSet<T, S> {
    fn default() -> Self {
        Self {
            elements: StdHashSet::default(),
        }
    }
}

impl<T, S> Set<T> for HashSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    fn add(&mut self, element: T) -> bool {
        self.elements.insert(element)
    }

    fn remove(&mut self, element: &T) -> bool {
        self.elements.remove(element)
    }

    fn contains(&self, element: &T) -> bool {
        self.elements.contains(element)
    }

    fn size(&self) -> usize {
        self.elements.len()
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        self.elements.iter().for_each(f);
    }

    fn find<P>(&self, mut predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.elements.iter().find(|&element| predicate(element)).cloned()
    }

    fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        let mut elements = StdHashSet::with_hasher(self.elements.hasher().clone());
        elements.extend(self.elements.iter().filter(|&element| predicate(element)).cloned());
        Self { elements }
    }

    fn union(&self, other: &Self) -> Self {
        let mut elements = self.elements.clone();
        elements.extend(other.elements.iter().cloned());
        Self { elements }
    }

    fn is_subset_of(&self, other: &Self) -> bool {
        self.elements.is_subset(&other.elements)
    }
}

impl<T: fmt::Debug, S> fmt::Debug for HashSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.elements.iter()).finish()
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use itertools::Itertools;

    fn set_of(elements: &[i32]) -> HashSet<i32> {
        elements.iter().copied().collect()
    }

    #[test]
    fn add_remove() {
        let mut set = HashSet::new();
        assert!(set.add(1));
        assert!(!set.add(1));
        assert_eq!(set.size(), 1);
        assert!(set.remove(&1));
        assert!(!set.remove(&1));
        assert_eq!(set.try_remove(&1), Err(Error::ElementNotFound));
        set.add(2);
        assert_eq!(set.try_remove(&2), Ok(2));
        assert!(set.is_empty());
        assert_eq!(set.get_any(), None);
    }

    #[test]
    fn algebra() {
        let a = set_of(&[1, 2, 3, 4]);
        let b = set_of(&[3, 4, 5]);
        assert_eq!(a.union(&b).to_vec().into_iter().sorted().collect_vec(), vec![1, 2, 3, 4, 5]);
        assert_eq!(a.intersection(&b).to_vec().into_iter().sorted().collect_vec(), vec![3, 4]);
        assert_eq!(a.difference(&b).to_vec().into_iter().sorted().collect_vec(), vec![1, 2]);
        assert!(set_of(&[3, 4]).is_subset_of(&a));
        assert!(a.is_superset_of(&set_of(&[1])));
        assert!(!a.is_subset_of(&b));
        assert_eq!(a.size(), 4);
    }

    #[test]
    fn find_and_filter() {
        let set = set_of(&[1, 2, 3, 4]);
        assert_eq!(set.find(|&v| v > 3), Some(4));
        assert_eq!(set.find(|&v| v > 4), None);
        let even = set.filter(|v| v % 2 == 0);
        assert_eq!(even.to_vec().into_iter().sorted().collect_vec(), vec![2, 4]);
        assert!(set.get_any().is_some());
    }
}
