//! Recursive build algorithm (§4.3).

use std::{cell::RefCell, rc::Rc};

use crate::{
    bucket::Bucket,
    conflicts::{self, Conflict},
    key::{Key, Value},
};

use super::{DenseNode, Entry, ModelNode, Node};

/// Build a subtree from a sorted, unique batch of pairs.
///
/// `bucket_size` is the index-wide hyper-parameter `B`. `aggregate_size` is
/// the look-ahead budget for the aggregation rule; `0` means unbounded.
/// `depth` is only used to pass through to recursive child builds (useful
/// for statistics / debugging, not consulted by the algorithm itself).
pub fn build<K: Key, V: Value>(
    pairs: &[(K, V)],
    bucket_size: usize,
    aggregate_size: usize,
    depth: usize,
) -> Node<K, V> {
    debug_assert!(!pairs.is_empty());
    debug_assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));

    let keys: Vec<K> = pairs.iter().map(|(k, _)| *k).collect();
    match conflicts::analyze(&keys, 2.0) {
        None => Node::Dense(build_dense(pairs, bucket_size)),
        Some(info) => Node::Model(build_model(pairs, info, bucket_size, aggregate_size, depth)),
    }
}

/// Dense fallback: a plain sorted array with `bucket_size` slots of
/// trailing slack before the next insert forces a rebuild.
fn build_dense<K: Key, V: Value>(pairs: &[(K, V)], bucket_size: usize) -> DenseNode<K, V> {
    DenseNode {
        pairs: pairs.to_vec(),
        capacity: pairs.len() + bucket_size,
    }
}

fn build_model<K: Key, V: Value>(
    pairs: &[(K, V)],
    info: conflicts::ConflictsInfo,
    bucket_size: usize,
    aggregate_size: usize,
    depth: usize,
) -> ModelNode<K, V> {
    let n = pairs.len();
    let conflicts = &info.conflicts;
    let mut entries: Vec<Entry<K, V>> = (0..info.slot_space).map(|_| Entry::Empty).collect();
    let mut size = 0usize;
    let mut size_sub_tree = 0usize;

    let mut i = 0usize;
    let mut j = 0usize;
    while i < conflicts.len() {
        let Conflict { position, count } = conflicts[i];
        if count == 0 {
            i += 1;
        } else if count == 1 {
            let (k, v) = pairs[j];
            entries[position] = Entry::Data(k, v);
            size += 1;
            size_sub_tree += 1;
            j += count;
            i += 1;
        } else if count <= bucket_size {
            entries[position] = Entry::Bucket(Box::new(Bucket::new(&pairs[j..j + count], bucket_size)));
            size_sub_tree += count;
            j += count;
            i += 1;
        } else {
            // Aggregation rule: look ahead while still within budget,
            // strictly consecutive, and every aggregated slot is itself a
            // heavy conflict.
            let mut k = i + 1;
            let mut seg_size = count;
            let end = if aggregate_size == 0 {
                conflicts.len()
            } else {
                (i + 1 + aggregate_size).min(conflicts.len())
            };
            while k < end
                && conflicts[k].position == conflicts[k - 1].position + 1
                && conflicts[k].count > bucket_size + 1
            {
                seg_size += conflicts[k].count;
                k += 1;
            }

            if seg_size == n {
                // The whole batch collapses back onto this node's slots;
                // build one distinct child per aggregated position instead
                // of one shared child, or we would recurse forever.
                for conflict in &conflicts[i..k] {
                    let child = build(
                        &pairs[j..j + conflict.count],
                        bucket_size,
                        aggregate_size,
                        depth + 1,
                    );
                    entries[conflict.position] = Entry::Child(Rc::new(RefCell::new(child)));
                    size_sub_tree += conflict.count;
                    j += conflict.count;
                }
            } else {
                let child = build(&pairs[j..j + seg_size], bucket_size, aggregate_size, depth + 1);
                let child = Rc::new(RefCell::new(child));
                for conflict in &conflicts[i..k] {
                    entries[conflict.position] = Entry::Child(Rc::clone(&child));
                }
                size_sub_tree += seg_size;
                j += seg_size;
            }
            i = k;
        }
    }

    ModelNode {
        model: info.model,
        entries,
        size,
        size_sub_tree,
    }
}
