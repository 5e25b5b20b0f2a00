//! The capability contract shared by every set variant.

use std::hash::Hash;

use crate::error::Error;

/// A collection of distinct elements.
///
/// Snapshot operations (`to_vec`, `for_each`, `find`, `get_any`, the set
/// algebra) have no defined order.
pub trait Set<T>
where
    T: Hash + Eq + Clone,
{
    /// Adds `element`. Returns `false` if it was already present.
    fn add(&mut self, element: T) -> bool;

    /// Removes `element`. Returns `false` if it was absent.
    fn remove(&mut self, element: &T) -> bool;

    /// Removes `element`, failing with [`Error::ElementNotFound`] when it is
    /// absent.
    fn try_remove(&mut self, element: &T) -> Result<T, Error> {
        if self.remove(element) {
            Ok(element.clone())
        } else {
            Err(Error::ElementNotFound)
        }
    }

    fn contains(&self, element: &T) -> bool;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn clear(&mut self);

    fn to_vec(&self) -> Vec<T> {
        let mut elements = Vec::with_capacity(self.size());
        self.for_each(|element| elements.push(element.clone()));
        elements
    }

    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&T);

    /// The first element (in iteration order) matching `predicate`.
    fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool;

    /// Some element of the set, or `None` if it is empty.
    fn get_any(&self) -> Option<T> {
        self.find(|_| true)
    }

    /// A new set with the elements matching `predicate`.
    fn filter<P>(&self, predicate: P) -> Self
    where
        Self: Sized,
        P: FnMut(&T) -> bool;

    /// Elements in either set.
    fn union(&self, other: &Self) -> Self
    where
        Self: Sized;

    /// Elements in both sets.
    fn intersection(&self, other: &Self) -> Self
    where
        Self: Sized,
    {
        self.filter(|element| other.contains(element))
    }

    /// Elements of `self` missing from `other`.
    fn difference(&self, other: &Self) -> Self
    where
        Self: Sized,
    {
        self.filter(|element| !other.contains(element))
    }

    fn is_subset_of(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.find(|element| !other.contains(element)).is_none()
    }

    fn is_superset_of(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        other.is_subset_of(self)
    }
}
