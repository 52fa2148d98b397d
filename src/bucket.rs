//! Fixed-capacity overflow bucket (§3, §4.4–§4.7).

use crate::key::{Key, Value};

/// Small sorted-by-insertion-order array of up to `capacity` colliding
/// pairs. `capacity` is the index-wide bucket-size hyper-parameter `B`.
#[derive(Debug, Clone)]
pub struct Bucket<K, V> {
    data: Vec<(K, V)>,
    capacity: usize,
}

impl<K: Key, V: Value> Bucket<K, V> {
    /// Build a bucket from `pairs`, which must not exceed `capacity`.
    pub fn new(pairs: &[(K, V)], capacity: usize) -> Self {
        debug_assert!(pairs.len() <= capacity);
        Bucket {
            data: pairs.to_vec(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn find(&self, key: K) -> Option<&V> {
        self.data.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Overwrite the value for `key` if present. Unlike the original
    /// source (see DESIGN.md open-question 3), this actually writes the
    /// new value through on a match.
    pub fn update(&mut self, key: K, value: V) -> bool {
        match self.data.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => {
                slot.1 = value;
                true
            }
            None => false,
        }
    }

    /// Remove `key`, compacting the array in place. Returns `1` if a pair
    /// was removed, `0` otherwise.
    pub fn remove(&mut self, key: K) -> usize {
        let before = self.data.len();
        self.data.retain(|(k, _)| *k != key);
        (before - self.data.len()).min(1)
    }

    /// Append `(key, value)` if there is room. Returns `false` when the
    /// bucket is full and the caller must rebuild into a child node.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.data.len() < self.capacity {
            self.data.push((key, value));
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, V)> {
        self.data.iter()
    }
}

#[cfg(test)]
#[path = "bucket_test.rs"]
mod bucket_test;
