//! Node-based sequences.
//!
//! [`LinkedList`] and [`LinkedQueue`] sit on `std::collections::LinkedList`;
//! [`LinkedStack`] keeps its own chain of boxed nodes.

use std::collections::LinkedList as StdLinkedList;
use std::fmt;
use std::iter::FromIterator;

use crate::array::check_index;
use crate::error::Error;
use crate::list::{Deque, List, Queue, Stack};

/// A doubly linked list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedList<T> {
    elements: StdLinkedList<T>,
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        Self {
            elements: StdLinkedList::new(),
        }
    }
}

impl<T: Clone> List<T> for LinkedList<T> {
    fn add(&mut self, element: T) {
        self.elements.push_back(element);
    }

    fn insert(&mut self, index: usize, element: T) -> Result<(), Error> {
        check_index(index, self.elements.len(), true)?;
        let mut tail = self.elements.split_off(index);
        self.elements.push_back(element);
        self.elements.append(&mut tail);
        Ok(())
    }

    fn get(&self, index: usize) -> Option<T> {
        self.elements.iter().nth(index).cloned()
    }

    fn set(&mut self, index: usize, element: T) -> Result<T, Error> {
        let len = self.elements.len();
        self.elements
            .iter_mut()
            .nth(index)
            .map(|slot| std::mem::replace(slot, element))
            .ok_or(Error::IndexOutOfBounds { index, len })
    }

    fn remove(&mut self, index: usize) -> Result<T, Error> {
        check_index(index, self.elements.len(), false)?;
        let mut tail = self.elements.split_off(index);
        let removed = tail.pop_front();
        self.elements.append(&mut tail);
        removed.ok_or(Error::IndexOutOfBounds {
            index,
            len: self.elements.len(),
        })
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

impl<T: Clone> Deque<T> for LinkedList<T> {
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

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

struct Node<T> {
    element: T,
    next: Option<Box<Node<T>>>,
}

/// A stack of singly linked nodes; the head is the top.
pub struct LinkedStack<T> {
    head: Option<Box<Node<T>>>,
    len: usize,
}

impl<T> LinkedStack<T> {
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    fn iter(&self) -> impl Iterator<Item = &T> {
        let mut cursor = self.head.as_deref();
        std::iter::from_fn(move || {
            let node = cursor?;
            cursor = node.next.as_deref();
            Some(&node.element)
        })
    }
}

impl<T> Default for LinkedStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Stack<T> for LinkedStack<T> {
    fn push(&mut self, element: T) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { element, next }));
        self.len += 1;
    }

    fn pop(&mut self) -> Result<T, Error> {
        let node = self.head.take().ok_or(Error::Empty)?;
        self.head = node.next;
        self.len -= 1;
        Ok(node.element)
    }

    fn peek(&self) -> Option<T> {
        self.head.as_ref().map(|node| node.element.clone())
    }

    fn size(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
        self.len = 0;
    }

    fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Drop for LinkedStack<T> {
    fn drop(&mut self) {
        // Unlink iteratively; recursive Box drops overflow on long chains.
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// A queue over a doubly linked list.
#[derive(Debug, Clone, Default)]
pub struct LinkedQueue<T> {
    elements: StdLinkedList<T>,
}

impl<T> LinkedQueue<T> {
    pub fn new() -> Self {
        Self {
            elements: StdLinkedList::new(),
        }
    }
}

impl<T: Clone> Queue<T> for LinkedQueue<T> {
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
