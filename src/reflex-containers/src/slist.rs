//! A singly linked list with constant-time access to both
//! ends.

use std::{fmt, marker::PhantomData, ptr::NonNull};

use crate::{Error, Result};

type Link<T> = Option<NonNull<Node<T>>>;

struct Node<T> {
    value: T,
    next: Link<T>,
}

impl<T> Node<T> {
    fn alloc(value: T, next: Link<T>) -> NonNull<Self> {
        let node = Box::new(Self { value, next });
        // SAFETY: `Box::into_raw` never returns null.
        unsafe { NonNull::new_unchecked(Box::into_raw(node)) }
    }
}

/// A singly linked list.
///
/// Nodes are individually heap-allocated and owned by the
/// list through `head`; `tail` is a non-owning shortcut to
/// the last node for O(1) appends.
pub struct SList<T> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

// SAFETY: The list exclusively owns its nodes, so it is as
// thread-safe as the values it stores.
unsafe impl<T: Send> Send for SList<T> {}
// SAFETY: See above. Shared access never mutates.
unsafe impl<T: Sync> Sync for SList<T> {}

impl<T> SList<T> {
    /// Creates an empty list.
    #[inline]
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Gets the number of elements in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Indicates whether the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Prepends `value` to the list.
    pub fn push_front(&mut self, value: T) -> &mut T {
        let node = Node::alloc(value, self.head);
        if self.tail.is_none() {
            self.tail = Some(node);
        }
        self.head = Some(node);
        self.len += 1;

        // SAFETY: `node` was just allocated and is owned by us.
        unsafe { &mut (*node.as_ptr()).value }
    }

    /// Appends `value` to the list.
    pub fn push_back(&mut self, value: T) -> &mut T {
        let node = Node::alloc(value, None);
        match self.tail {
            // SAFETY: `tail` always points to the live last node.
            Some(tail) => unsafe { (*tail.as_ptr()).next = Some(node) },
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;

        // SAFETY: `node` was just allocated and is owned by us.
        unsafe { &mut (*node.as_ptr()).value }
    }

    /// Removes and returns the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        self.head.map(|head| {
            // SAFETY: `head` was allocated through `Node::alloc`
            // and is unlinked from the list right after.
            let node = unsafe { Box::from_raw(head.as_ptr()) };
            self.head = node.next;
            if self.head.is_none() {
                self.tail = None;
            }
            self.len -= 1;

            node.value
        })
    }

    /// Removes and returns the last element.
    ///
    /// This walks the list and takes linear time.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len <= 1 {
            return self.pop_front();
        }

        let tail = self.tail?;
        let mut current = self.head?;
        // SAFETY: With at least two nodes, the walk stops on the
        // node preceding `tail`, and every visited link is live.
        unsafe {
            while (*current.as_ptr()).next != Some(tail) {
                current = (*current.as_ptr()).next?;
            }
            (*current.as_ptr()).next = None;
            self.tail = Some(current);
            self.len -= 1;

            Some(Box::from_raw(tail.as_ptr()).value)
        }
    }

    /// Gets the first element.
    pub fn front(&self) -> Option<&T> {
        // SAFETY: Live nodes are valid for the lifetime of `&self`.
        self.head.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Gets the first element mutably.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: Live nodes are valid for the lifetime of `&mut self`.
        self.head.map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Gets the last element.
    pub fn back(&self) -> Option<&T> {
        // SAFETY: Live nodes are valid for the lifetime of `&self`.
        self.tail.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Gets the last element mutably.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        // SAFETY: Live nodes are valid for the lifetime of `&mut self`.
        self.tail.map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    /// Inserts `value` directly after the element at `index`.
    pub fn insert_after(&mut self, index: usize, value: T) -> Result<&mut T> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }

        let mut current = self.head.ok_or(Error::Empty)?;
        // SAFETY: `index < len`, so every link we follow is live.
        unsafe {
            for _ in 0..index {
                current = (*current.as_ptr()).next.ok_or(Error::Empty)?;
            }

            let node = Node::alloc(value, (*current.as_ptr()).next);
            (*current.as_ptr()).next = Some(node);
            if self.tail == Some(current) {
                self.tail = Some(node);
            }
            self.len += 1;

            Ok(&mut (*node.as_ptr()).value)
        }
    }

    /// Removes and returns the first element matching `f`.
    pub fn remove_where<F: FnMut(&T) -> bool>(&mut self, mut f: F) -> Option<T> {
        let mut previous: Link<T> = None;
        let mut current = self.head;

        // SAFETY: We only follow live links and unlink the node
        // before reclaiming its allocation.
        unsafe {
            while let Some(node) = current {
                if f(&(*node.as_ptr()).value) {
                    let next = (*node.as_ptr()).next;
                    match previous {
                        Some(previous) => (*previous.as_ptr()).next = next,
                        None => self.head = next,
                    }
                    if self.tail == Some(node) {
                        self.tail = previous;
                    }
                    self.len -= 1;

                    return Some(Box::from_raw(node.as_ptr()).value);
                }

                previous = current;
                current = (*node.as_ptr()).next;
            }
        }

        None
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Gets an iterator over shared references to the
    /// elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head,
            len: self.len,
            _marker: PhantomData,
        }
    }

    /// Gets an iterator over mutable references to the
    /// elements.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            next: self.head,
            len: self.len,
            _marker: PhantomData,
        }
    }
}

impl<T: PartialEq> SList<T> {
    /// Finds the first element equal to `value`.
    pub fn find(&self, value: &T) -> Option<&T> {
        self.iter().find(|v| *v == value)
    }

    /// Removes the first element equal to `value`.
    ///
    /// Returns whether an element was removed.
    pub fn remove(&mut self, value: &T) -> bool {
        self.remove_where(|v| v == value).is_some()
    }
}

impl<T> Drop for SList<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for SList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for SList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for SList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for SList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> FromIterator<T> for SList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}

/// Iterator over shared references into a [`SList`].
pub struct Iter<'a, T> {
    next: Link<T>,
    len: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            // SAFETY: The list is borrowed for `'a`, so its nodes
            // stay alive and unaliased by mutable references.
            let node = unsafe { &*node.as_ptr() };
            self.next = node.next;
            self.len -= 1;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Iterator over mutable references into a [`SList`].
pub struct IterMut<'a, T> {
    next: Link<T>,
    len: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            // SAFETY: The list is mutably borrowed for `'a` and
            // every node is yielded at most once.
            let node = unsafe { &mut *node.as_ptr() };
            self.next = node.next;
            self.len -= 1;
            &mut node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// Owning iterator over the elements of a [`SList`].
pub struct IntoIter<T>(SList<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<T> IntoIterator for SList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl<'a, T> IntoIterator for &'a SList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SList<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_tracks_removals() {
        let mut list: SList<i32> = (1..=3).collect();
        assert_eq!(list.remove_where(|v| *v == 3), Some(3));
        list.push_back(4);
        assert_eq!(list.back(), Some(&4));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 4]);

        assert_eq!(list.pop_back(), Some(4));
        assert_eq!(list.pop_back(), Some(2));
        assert_eq!(list.pop_back(), Some(1));
        assert!(list.tail.is_none());
        assert_eq!(list.pop_back(), None);
    }
}
