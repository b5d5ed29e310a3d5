//! Fixed-capacity circular buffer.
//!
//! Capacity is a power of two so positions wrap with a mask. One slot is kept
//! free to tell a full buffer from an empty one, so a buffer of capacity `n`
//! holds at most `n - 1` items.

use std::ops::{Index, IndexMut};

/// Circular buffer with head/tail cursors.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
}

impl<T> RingBuffer<T> {
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two or is smaller than 2.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity >= 2 && capacity.is_power_of_two(),
            "ring buffer capacity must be a power of two of at least 2, got {capacity}"
        );
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
        }
    }

    #[inline]
    const fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of items held
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tail.wrapping_sub(self.head) & self.mask()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len() == self.mask()
    }

    /// # Panics
    ///
    /// Panics if the buffer is full.
    pub fn push_back(&mut self, item: T) {
        assert!(!self.is_full(), "token buffer overflow");
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) & self.mask();
    }

    /// # Panics
    ///
    /// Panics if the buffer is full.
    pub fn push_front(&mut self, item: T) {
        assert!(!self.is_full(), "token buffer overflow");
        self.head = self.head.wrapping_sub(1) & self.mask();
        self.slots[self.head] = Some(item);
    }

    /// # Panics
    ///
    /// Panics if the buffer is empty.
    pub fn pop_front(&mut self) -> T {
        assert!(!self.is_empty(), "token buffer underflow");
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) & self.mask();
        item.expect("occupied slot between head and tail")
    }

    /// The item at the head.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[must_use]
    pub fn peek(&self) -> &T {
        assert!(!self.is_empty(), "token buffer underflow");
        &self[0]
    }

    /// The item `index` places after the head
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        self.slots[(self.head + index) & self.mask()].as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len() {
            return None;
        }
        let slot = (self.head + index) & self.mask();
        self.slots[slot].as_mut()
    }

    pub fn clear(&mut self) {
        while !self.is_empty() {
            self.pop_front();
        }
    }

    /// Items from head to tail
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.get(index)
            .unwrap_or_else(|| panic!("index {index} out of range for {} buffered items", self.len()))
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        self.get_mut(index)
            .unwrap_or_else(|| panic!("index {index} out of range for {len} buffered items"))
    }
}
