//! Index façade: owns the root, hyper-parameters, and dispatches the user
//! API (§4.8, §6 core API).

use crate::{
    conflicts,
    key::{Key, Value},
    node::{self, Node},
    stats::{self, Stats},
};

const MAX_BUCKET_SIZE: usize = 6;
const MIN_BUCKET_SIZE: usize = 1;
const SIZE_AMPLIFICATION: f64 = 2.0;

/// A learned in-memory ordered key-value index: a recursive tree of
/// model-driven nodes, built once by [`Afli::bulk_load`] and mutated by
/// [`Afli::find`]/[`Afli::update`]/[`Afli::insert`]/[`Afli::remove`].
pub struct Afli<K, V> {
    root: Option<Node<K, V>>,
    bucket_size: usize,
    aggregate_size: usize,
}

impl<K: Key, V: Value> Default for Afli<K, V> {
    fn default() -> Self {
        Afli {
            root: None,
            bucket_size: 0,
            aggregate_size: 0,
        }
    }
}

impl<K: Key, V: Value> Afli<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from a sorted, unique batch of pairs.
    ///
    /// # Panics
    /// Panics if the index is not empty, or (debug builds only) if `pairs`
    /// is not sorted ascending by key — both are caller preconditions
    /// (§7 "precondition violated ... fatal assertion").
    pub fn bulk_load(&mut self, pairs: &[(K, V)], bucket_size: Option<usize>, aggregate_size: usize) {
        assert!(self.root.is_none(), "the index must be empty before bulk loading");
        debug_assert!(
            pairs.windows(2).all(|w| w[0].0 < w[1].0),
            "bulk_load input must be sorted and unique"
        );

        self.bucket_size = match bucket_size {
            Some(b) => b.clamp(MIN_BUCKET_SIZE, MAX_BUCKET_SIZE),
            None => compute_bucket_size(pairs),
        };
        self.aggregate_size = aggregate_size;

        if !pairs.is_empty() {
            self.root = Some(node::build(pairs, self.bucket_size, self.aggregate_size, 1));
        }
    }

    pub fn find(&self, key: K) -> Option<V> {
        self.root.as_ref().and_then(|root| root.find(key))
    }

    /// Overwrite the value for `key` if present. Returns `false` if `key`
    /// is absent (§7 "unknown key on update").
    pub fn update(&mut self, key: K, value: V) -> bool {
        match self.root.as_mut() {
            Some(root) => root.update(key, value),
            None => false,
        }
    }

    /// Remove `key`. Returns `1` if it was present, `0` otherwise (§7
    /// "unknown key on remove").
    pub fn remove(&mut self, key: K) -> usize {
        match self.root.as_mut() {
            Some(root) => root.remove(key),
            None => 0,
        }
    }

    /// Insert `(key, value)`. `key` must be absent (§6 `insert`
    /// precondition; undefined behavior on a duplicate).
    pub fn insert(&mut self, key: K, value: V) {
        match self.root.as_mut() {
            Some(root) => root.insert(key, value, self.bucket_size, self.aggregate_size, 1),
            None => {
                self.bucket_size = self.bucket_size.max(MIN_BUCKET_SIZE);
                self.root = Some(node::build(&[(key, value)], self.bucket_size, self.aggregate_size, 1));
            }
        }
    }

    pub fn to_stats(&self) -> Stats {
        let mut stats = Stats::default();
        if let Some(root) = &self.root {
            stats::collect(root, 1, &mut stats);
        }
        stats
    }

    /// Structural metadata only, in bytes (§6 `model_size`).
    pub fn model_size(&self) -> usize {
        self.to_stats().model_size
    }

    /// Metadata plus payload storage, in bytes (§6 `index_size`).
    pub fn index_size(&self) -> usize {
        self.to_stats().index_size
    }

    pub fn bucket_size_param(&self) -> usize {
        self.bucket_size
    }

    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, Node::size_sub_tree)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bucket-size auto-compute (§4.9): fit a model with `A = 2.0`, take the
/// 99th-percentile tail conflict count over the whole batch, clamp to
/// `[1, 6]`.
fn compute_bucket_size<K: Key, V: Value>(pairs: &[(K, V)]) -> usize {
    if pairs.is_empty() {
        return MIN_BUCKET_SIZE;
    }
    let keys: Vec<K> = pairs.iter().map(|(k, _)| *k).collect();
    let tail = conflicts::tail_conflicts(&keys, SIZE_AMPLIFICATION) as usize;
    tail.clamp(MIN_BUCKET_SIZE, MAX_BUCKET_SIZE)
}

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;
