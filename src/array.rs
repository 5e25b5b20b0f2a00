//! Contiguous-storage sequences over `Vec` and `VecDeque`.

use std::collections::VecDeque;
use std::iter::FromIterator;

use crate::error::Error;
use crate::list::{Deque, List, Queue, Stack};

/// Fails unless `index < len` (or `index <= len` when `inclusive`).
pub(crate) fn check_index(index: usize, len: usize, inclusive: bool) -> Result<(), Error> {
    if index < len || (inclusive && index == len) {
        Ok(())
    } else {
        Err(Error::IndexOutOfBounds { index, len })
    }
}

/// A growable list backed by a `Vec`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayList<T> {
    elements: Vec<T>,
}

impl<T> ArrayList<T> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }
}

impl<T: Clone> List<T> for ArrayList<T> {
    fn add(&mut self, element: T) {
        self.elements.push(element);
    }

    fn insert(&mut self, index: usize, element: T) -> Result<(), Error> {
        check_index(index, self.elements.len(), true)?;
        self.elements.insert(index, element);
        Ok(())
    }

    fn get(&self, index: usize) -> Option<T> {
        self.elements.get(index).cloned()
    }

    fn set(&mut self, index: usize, element: T) -> Result<T, Error> {
        let len = self.elements.len();
        self.elements
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, element))
            .ok_or(Error::IndexOutOfBounds { index, len })
    }

    fn remove(&mut self, index: usize) -> Result<T, Error> {
        check_index(index, self.elements.len(), false)?;
        Ok(self.elements.remove(index))
    }

    fn index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.elements.iter().position(|e| e == element)
    }

    fn last_index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.elements.iter().rposition(|e| e == element)
    }

    fn size(&self) -> usize {
        self.elements.len()
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn to_vec(&self) -> Vec<T> {
        self.elements.clone()
    }

    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&T),
    {
        self.elements.iter().for_each(f);
    }
}

impl<T> FromIterator<T> for ArrayList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

/// A double-ended list backed by a ring buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayDeque<T> {
    elements: VecDeque<T>,
}

impl<T> ArrayDeque<T> {
    pub fn new() -> Self {
        Self {
            elements: VecDeque::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: VecDeque::with_capacity(capacity),
        }
    }
}

impl<T: Clone> List<T> for ArrayDeque<T> {
    fn add(&mut self, element: T) {
        self.elements.push_back(element);
    }

    fn insert(&mut self, index: usize, element: T) -> Result<(), Error> {
        check_index(index, self.elements.len(), true)?;
        self.elements.insert(index, element);
        Ok(())
    }

    fn get(&self, index: usize) -> Option<T> {
        self.elements.get(index).cloned()
    }

    fn set(&mut self, index: usize, element: T) -> Result<T, Error> {
        let len = self.elements.len();
        self.elements
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, element))
            .ok_or(Error::IndexOutOfBounds { index, len })
    }

    fn remove(&mut self, index: usize) -> Result<T, Error> {
        let len = self.elements.len();
        self.elements
            .remove(index)
            .ok_or(Error::IndexOutOfBounds { index, len })
    }

    fn index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.elements.iter().position(|e| e == element)
    }

    fn last_index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.elements.iter().rposition(|e| e == element)
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
}

impl<T: Clone> Deque<T> for ArrayDeque<T> {
    fn add_first(&mut self, element: T) {
        self.elements.push_front(element);
    }

    fn remove_first(&mut self) -> Result<T, Error> {
        self.elements.pop_front().ok_or(Error::Empty)
    }

    fn remove_last(&mut self) -> Result<T, Error> {
        self.elements.pop_back().ok_or(Error::Empty)
    }

    fn peek_first(&self) -> Option<T> {
        self.elements.front().cloned()
    }

    fn peek_last(&self) -> Option<T> {
        self.elements.back().cloned()
    }
}

impl<T> FromIterator<T> for ArrayDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

/// A stack whose top is the end of a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct ArrayStack<T> {
    elements: Vec<T>,
}

impl<T> ArrayStack<T> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }
}

impl<T: Clone> Stack<T> for ArrayStack<T> {
    fn push(&mut self, element: T) {
        self.elements.push(element);
    }

    fn pop(&mut self) -> Result<T, Error> {
        self.elements.pop().ok_or(Error::Empty)
    }

    fn peek(&self) -> Option<T> {
        self.elements.last().cloned()
    }

    fn size(&self) -> usize {
        self.elements.len()
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn to_vec(&self) -> Vec<T> {
        self.elements.iter().rev().cloned().collect()
    }
}

/// A queue over a ring buffer.
#[derive(Debug, Clone, Default)]
pub struct ArrayQueue<T> {
    elements: VecDeque<T>,
}

impl<T> ArrayQueue<T> {
    pub fn new() -> Self {
        Self {
            elements: VecDeque::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: VecDeque::with_capacity(capacity),
        }
    }
}

impl<T: Clone> Queue<T> for ArrayQueue<T> {
    fn enqueue(&mut self, element: T) {
        self.elements.push_back(element);
    }

    fn dequeue(&mut self) -> Result<T, Error> {
        self.elements.pop_front().ok_or(Error::Empty)
    }

    fn peek(&self) -> Option<T> {
        self.elements.front().cloned()
    }

    fn size(&self) -> usize {
        self.elements.len()
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn to_vec(&self) -> Vec<T> {
        self.elements.iter().cloned().collect()
    }
}
