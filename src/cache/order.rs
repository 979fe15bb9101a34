//! Recency Order Module
//!
//! Tracks write order for FIFO-with-promotion eviction.

use std::collections::VecDeque;

// == Recency Order ==
/// Tracks the order in which keys were last written.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest write (next to be evicted)
/// - Back = Most recent write
///
/// A key appears at most once.
#[derive(Debug, Default, Clone)]
pub struct RecencyOrder {
    order: VecDeque<String>,
}

impl RecencyOrder {
    // == Constructor ==
    /// Creates a new empty order.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Push Newest ==
    /// Marks a key as the most recent write.
    ///
    /// An existing occurrence is removed first, so the key is promoted
    /// rather than duplicated.
    pub fn push_newest(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the order.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.position(key) {
            self.order.remove(pos);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the oldest key.
    ///
    /// Returns None if the order is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    /// Returns the oldest key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.order.front().map(String::as_str)
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    /// Returns true if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    // == Iter ==
    /// Iterates keys oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|k| k == key)
    }
}
