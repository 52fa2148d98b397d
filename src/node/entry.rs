//! Per-slot tagged entry (§3, §9 "bitmap-tagged union of entries").
//!
//! The original design packs the tag into two parallel bitmaps per node,
//! reading a slot's 2-bit type before dereferencing a byte-addressed union.
//! This crate uses a plain tagged enum instead — behaviorally identical,
//! memory-layout different, as sanctioned by design note §9.

use std::{cell::RefCell, rc::Rc};

use crate::{bucket::Bucket, key::Key};

use super::Node;

/// One slot of a model node's entry array.
pub enum Entry<K, V> {
    Empty,
    Data(K, V),
    Bucket(Box<Bucket<K, V>>),
    /// A child subtree. A contiguous run of slots holding `Rc`s that are
    /// `Rc::ptr_eq` to each other is the aggregation rule's shared-view
    /// alias run (§4.3, §9) — only the first slot in the run is treated
    /// as the owner when walking or reporting statistics.
    Child(Rc<RefCell<Node<K, V>>>),
}

impl<K: Key, V: Copy> Entry<K, V> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Entry::Empty)
    }

    /// Whether `self` and `other` are the same aliased child, i.e. the two
    /// slots belong to the same aggregation run.
    pub fn aliases(&self, other: &Entry<K, V>) -> bool {
        match (self, other) {
            (Entry::Child(a), Entry::Child(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
