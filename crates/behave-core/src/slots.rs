//! Fixed-capacity reference arrays.
//!
//! A variable's producer and consumer arrays are sized once, from the exact
//! number of functions that name it, and then filled exactly once per slot.

use serde::{Deserialize, Serialize};

/// Pushing into a full slot array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("slot overflow: all {capacity} slots are filled")]
pub struct SlotOverflow {
    pub capacity: usize,
}

/// A vector whose length may never exceed the capacity it was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slots<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T> Slots<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Fill the next empty slot.
    pub fn push(&mut self, item: T) -> Result<(), SlotOverflow> {
        if self.items.len() == self.capacity {
            return Err(SlotOverflow {
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether every slot has been filled.
    pub fn is_filled(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a Slots<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
