//! Least-recently-used cache over data register values.
//!
//! Entries are kept in recency order: the front of the queue is the least
//! recently used entry and the back is the most recently used one. The cache
//! never owns a value the register file does not also hold; eviction only
//! drops the cached copy.

use std::collections::VecDeque;

/// Fixed-capacity LRU cache of `(register index, value)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LruCache {
    capacity: usize,
    entries: VecDeque<(usize, i64)>,
}

impl LruCache {
    /// Creates an empty cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.saturating_add(1)),
        }
    }

    /// Maximum number of entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` when `index` has a cached copy.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.position(index).is_some()
    }

    /// On a hit, marks `index` most recently used and returns its value.
    pub fn touch(&mut self, index: usize) -> Option<i64> {
        let position = self.position(index)?;
        let entry = self.entries.remove(position)?;
        self.entries.push_back(entry);
        Some(entry.1)
    }

    /// Inserts `index` as most recently used.
    ///
    /// Returns the least recently used entry when the insertion overflowed
    /// the capacity. Callers must only insert indices that are not cached.
    pub fn insert(&mut self, index: usize, value: i64) -> Option<(usize, i64)> {
        debug_assert!(!self.contains(index));
        self.entries.push_back((index, value));
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Updates a cached copy in place without changing recency order.
    ///
    /// Returns `false` when `index` is not cached.
    pub fn update(&mut self, index: usize, value: i64) -> bool {
        match self.entries.iter_mut().find(|(cached, _)| *cached == index) {
            Some(entry) => {
                entry.1 = value;
                true
            }
            None => false,
        }
    }

    /// Entries from least to most recently used.
    pub fn entries(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.entries.iter().copied()
    }

    fn position(&self, index: usize) -> Option<usize> {
        self.entries.iter().position(|(cached, _)| *cached == index)
    }
}
