use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use crate::{grow, DefaultIncrement, Error, Increment, Result};

/// A contiguous growable array with explicitly tracked
/// capacity.
///
/// Unlike [`Vec`], growth is driven by an [`Increment`]
/// policy chosen per call to [`Vector::push_back_with`],
/// and the capacity reported by [`Vector::capacity`] is
/// exactly what was requested.
pub struct Vector<T> {
    data: Vec<T>,
    capacity: usize,
}

impl<T> Vector<T> {
    /// Creates an empty vector without allocating.
    #[inline]
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            capacity: 0,
        }
    }

    /// Creates an empty vector with room for `capacity`
    /// elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Gets the number of elements the vector can hold
    /// before it has to grow.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Gets the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Gets the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Gets a raw pointer to the first element.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr()
    }

    /// Grows the capacity to at least `capacity`. Never
    /// shrinks.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.data.reserve_exact(capacity - self.data.len());
            self.capacity = capacity;
        }
    }

    /// Drops capacity that is not occupied by elements.
    pub fn shrink_to_fit(&mut self) {
        self.data.shrink_to_fit();
        self.capacity = self.data.len();
    }

    /// Appends `value`, growing with [`DefaultIncrement`]
    /// when full.
    #[inline]
    pub fn push_back(&mut self, value: T) -> &mut T {
        self.push_back_with(value, &DefaultIncrement)
    }

    /// Appends `value`, growing with `policy` when full.
    pub fn push_back_with<I: Increment + ?Sized>(&mut self, value: T, policy: &I) -> &mut T {
        let len = self.data.len();
        if len == self.capacity {
            let capacity = grow(policy, len, self.capacity);
            self.reserve(capacity);
        }

        self.data.push(value);
        &mut self.data[len]
    }

    /// Removes the last element, if any.
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        self.data.pop()
    }

    /// Gets the element at `index`.
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.data.len();
        self.data
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Gets the element at `index` mutably.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.data.len();
        self.data
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Gets the first element.
    pub fn front(&self) -> Result<&T> {
        self.data.first().ok_or(Error::Empty)
    }

    /// Gets the first element mutably.
    pub fn front_mut(&mut self) -> Result<&mut T> {
        self.data.first_mut().ok_or(Error::Empty)
    }

    /// Gets the last element.
    pub fn back(&self) -> Result<&T> {
        self.data.last().ok_or(Error::Empty)
    }

    /// Gets the last element mutably.
    pub fn back_mut(&mut self) -> Result<&mut T> {
        self.data.last_mut().ok_or(Error::Empty)
    }

    /// Resizes to `len` elements, filling new slots with
    /// values produced by `f`.
    ///
    /// Shrinking drops the trimmed elements but keeps the
    /// capacity.
    pub fn resize_with<F: FnMut() -> T>(&mut self, len: usize, f: F) {
        self.reserve(len);
        self.data.resize_with(len, f);
    }

    /// Removes all elements while keeping the capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Removes the element at `index`, shifting all
    /// following elements down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let len = self.data.len();
        if index < len {
            Ok(self.data.remove(index))
        } else {
            Err(Error::IndexOutOfRange { index, len })
        }
    }

    /// Inserts `value` at `index`, shifting all following
    /// elements up by one.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.data.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        if len == self.capacity {
            let capacity = grow(&DefaultIncrement, len, self.capacity);
            self.reserve(capacity);
        }
        self.data.insert(index, value);

        Ok(())
    }

    /// Retains only the elements matching `f`.
    #[inline]
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, f: F) {
        self.data.retain(f);
    }
}

impl<T: PartialEq> Vector<T> {
    /// Finds the index of the first element equal to
    /// `value`.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.data.iter().position(|v| v == value)
    }

    /// Finds the first element equal to `value`.
    pub fn find(&self, value: &T) -> Option<&T> {
        self.data.iter().find(|v| *v == value)
    }

    /// Removes the first element equal to `value`.
    ///
    /// Returns whether an element was removed.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.index_of(value) {
            Some(index) => {
                self.data.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<T: Default> Vector<T> {
    /// Resizes to `len` elements, filling new slots with
    /// default values.
    #[inline]
    pub fn resize(&mut self, len: usize) {
        self.resize_with(len, T::default);
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    fn clone(&self) -> Self {
        let mut data = Vec::with_capacity(self.capacity);
        data.extend_from_slice(&self.data);

        Self {
            data,
            capacity: self.capacity,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T> Deref for Vector<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> DerefMut for Vector<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        let capacity = data.len();
        let mut data = data;
        data.shrink_to_fit();

        Self { data, capacity }
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter_mut()
    }
}
