//! Point operations: find, update, remove, insert (§4.4–§4.7).

use std::{cell::RefCell, rc::Rc};

use crate::{
    bucket::Bucket,
    key::{Key, Value},
};

use super::{build, DenseNode, Entry, ModelNode, Node};

impl<K: Key, V: Value> Node<K, V> {
    pub fn find(&self, key: K) -> Option<V> {
        match self {
            Node::Model(m) => m.find(key),
            Node::Dense(d) => d.find(key),
        }
    }

    pub fn update(&mut self, key: K, value: V) -> bool {
        match self {
            Node::Model(m) => m.update(key, value),
            Node::Dense(d) => d.update(key, value),
        }
    }

    pub fn remove(&mut self, key: K) -> usize {
        match self {
            Node::Model(m) => m.remove(key),
            Node::Dense(d) => d.remove(key),
        }
    }

    /// `key` must be absent from the tree; behavior is undefined on a
    /// duplicate (§6 `insert` precondition).
    pub fn insert(&mut self, key: K, value: V, bucket_size: usize, aggregate_size: usize, depth: usize) {
        match self {
            Node::Model(m) => m.insert(key, value, bucket_size, aggregate_size, depth),
            Node::Dense(d) => {
                if d.pairs.len() < d.capacity {
                    d.insert(key, value);
                } else {
                    let mut pairs = d.pairs.clone();
                    pairs.push((key, value));
                    pairs.sort_by(|a, b| a.0.cmp(&b.0));
                    *self = build::build(&pairs, bucket_size, aggregate_size, depth);
                }
            }
        }
    }
}

impl<K: Key, V: Value> ModelNode<K, V> {
    fn slot(&self, key: K) -> usize {
        self.model.predict_clamped(key, self.entries.len())
    }

    fn find(&self, key: K) -> Option<V> {
        match &self.entries[self.slot(key)] {
            Entry::Empty => None,
            Entry::Data(k, v) => (*k == key).then_some(*v),
            Entry::Bucket(b) => b.find(key).copied(),
            Entry::Child(child) => child.borrow().find(key),
        }
    }

    fn update(&mut self, key: K, value: V) -> bool {
        let idx = self.slot(key);
        match &mut self.entries[idx] {
            Entry::Empty => false,
            Entry::Data(k, v) => {
                if *k == key {
                    *v = value;
                    true
                } else {
                    false
                }
            }
            Entry::Bucket(b) => b.update(key, value),
            Entry::Child(child) => child.borrow_mut().update(key, value),
        }
    }

    fn remove(&mut self, key: K) -> usize {
        let idx = self.slot(key);
        let removed = match &mut self.entries[idx] {
            Entry::Empty => 0,
            Entry::Data(k, _) => {
                if *k == key {
                    self.entries[idx] = Entry::Empty;
                    self.size -= 1;
                    1
                } else {
                    0
                }
            }
            Entry::Bucket(b) => b.remove(key),
            Entry::Child(child) => child.borrow_mut().remove(key),
        };
        self.size_sub_tree -= removed;
        removed
    }

    fn insert(&mut self, key: K, value: V, bucket_size: usize, aggregate_size: usize, depth: usize) {
        self.size_sub_tree += 1;
        let idx = self.slot(key);
        match std::mem::replace(&mut self.entries[idx], Entry::Empty) {
            Entry::Empty => {
                self.entries[idx] = Entry::Data(key, value);
                self.size += 1;
            }
            Entry::Data(k0, v0) => {
                self.size -= 1;
                let mut bucket = Bucket::new(&[(k0, v0)], bucket_size);
                if bucket.insert(key, value) {
                    self.entries[idx] = Entry::Bucket(Box::new(bucket));
                } else {
                    // `bucket_size == 1`: the promoted bucket has no room
                    // even for the first overflow pair, so go straight to
                    // a child (mirrors the bucket-overflow path below).
                    let mut pairs = vec![(k0, v0), (key, value)];
                    pairs.sort_by(|a, b| a.0.cmp(&b.0));
                    let child = build::build(&pairs, bucket_size, aggregate_size, depth + 1);
                    self.entries[idx] = Entry::Child(Rc::new(RefCell::new(child)));
                }
            }
            Entry::Bucket(mut bucket) => {
                if bucket.insert(key, value) {
                    self.entries[idx] = Entry::Bucket(bucket);
                } else {
                    let mut pairs: Vec<(K, V)> = bucket.iter().copied().collect();
                    pairs.push((key, value));
                    pairs.sort_by(|a, b| a.0.cmp(&b.0));
                    let child = build::build(&pairs, bucket_size, aggregate_size, depth + 1);
                    self.entries[idx] = Entry::Child(Rc::new(RefCell::new(child)));
                }
            }
            Entry::Child(child) => {
                child
                    .borrow_mut()
                    .insert(key, value, bucket_size, aggregate_size, depth + 1);
                self.entries[idx] = Entry::Child(child);
            }
        }
    }
}

impl<K: Key, V: Value> DenseNode<K, V> {
    fn find(&self, key: K) -> Option<V> {
        self.pairs
            .binary_search_by(|(k, _)| k.cmp(&key))
            .ok()
            .map(|idx| self.pairs[idx].1)
    }

    fn update(&mut self, key: K, value: V) -> bool {
        match self.pairs.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(idx) => {
                self.pairs[idx].1 = value;
                true
            }
            Err(_) => false,
        }
    }

    fn remove(&mut self, key: K) -> usize {
        match self.pairs.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(idx) => {
                self.pairs.remove(idx);
                1
            }
            Err(_) => 0,
        }
    }

    fn insert(&mut self, key: K, value: V) {
        let idx = match self.pairs.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(idx) | Err(idx) => idx,
        };
        self.pairs.insert(idx, (key, value));
    }
}
