//! Sequence contracts: indexed lists, double-ended lists, stacks and queues.
//!
//! Out-of-range positions fail with [`Error::IndexOutOfBounds`], removals
//! from an empty container fail with [`Error::Empty`], and plain lookups
//! report absence with `None`.

use crate::error::Error;

/// An ordered, indexable sequence.
pub trait List<T: Clone> {
    /// Appends `element` at the end.
    fn add(&mut self, element: T);

    /// Inserts `element` at `index`, shifting later elements. `index` may be
    /// equal to the length.
    fn insert(&mut self, index: usize, element: T) -> Result<(), Error>;

    fn get(&self, index: usize) -> Option<T>;

    /// Replaces the element at `index`, returning the previous one.
    fn set(&mut self, index: usize, element: T) -> Result<T, Error>;

    /// Removes and returns the element at `index`.
    fn remove(&mut self, index: usize) -> Result<T, Error>;

    /// Removes the first element equal to `element`. Returns whether one was
    /// found.
    fn remove_element(&mut self, element: &T) -> bool
    where
        T: PartialEq,
    {
        match self.index_of(element) {
            Some(index) => self.remove(index).is_ok(),
            None => false,
        }
    }

    fn index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq;

    fn last_index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq;

    fn contains(&self, element: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(element).is_some()
    }

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn clear(&mut self);

    /// Front-to-back copy of the elements.
    fn to_vec(&self) -> Vec<T> {
        let mut elements = Vec::with_capacity(self.size());
        self.for_each(|element| elements.push(element.clone()));
        elements
    }

    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&T);
}

/// A list with cheap access at both ends.
pub trait Deque<T: Clone>: List<T> {
    fn add_first(&mut self, element: T);

    fn add_last(&mut self, element: T) {
        self.add(element);
    }

    fn remove_first(&mut self) -> Result<T, Error>;

    fn remove_last(&mut self) -> Result<T, Error>;

    fn peek_first(&self) -> Option<T>;

    fn peek_last(&self) -> Option<T>;
}

/// Last in, first out.
pub trait Stack<T: Clone> {
    fn push(&mut self, element: T);

    fn pop(&mut self) -> Result<T, Error>;

    fn peek(&self) -> Option<T>;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn clear(&mut self);

    /// Elements from top to bottom.
    fn to_vec(&self) -> Vec<T>;
}

/// First in, first out.
pub trait Queue<T: Clone> {
    fn enqueue(&mut self, element: T);

    fn dequeue(&mut self) -> Result<T, Error>;

    fn peek(&self) -> Option<T>;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn clear(&mut self);

    /// Elements from front to back.
    fn to_vec(&self) -> Vec<T>;
}
