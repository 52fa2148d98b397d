//! Recursive tree node: model node or dense node (§3, §4.3–§4.7).

mod build;
mod entry;
mod ops;

pub use build::build;
pub use entry::Entry;

use crate::model::LinearModel;

/// A model-driven node: routes by linear prediction into a 2-bit-tagged
/// slot array (here, a tagged [`Entry`] array).
pub struct ModelNode<K, V> {
    pub(crate) model: LinearModel,
    pub(crate) entries: Vec<Entry<K, V>>,
    /// Count of slots directly tagged `Data` (not reachable through a
    /// bucket or child).
    pub(crate) size: usize,
    /// Total live pairs reachable from this node, inclusive of buckets and
    /// children — recomputed incrementally on every mutation (§3 invariant
    /// 2).
    pub(crate) size_sub_tree: usize,
}

impl<K, V> ModelNode<K, V> {
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}

/// A model-less fallback node: a plain sorted array, used when no useful
/// linear model could be fit to the input batch (§4.3 "dense fallback",
/// Open Question 1 — the canonical unpadded layout).
pub struct DenseNode<K, V> {
    pub(crate) pairs: Vec<(K, V)>,
    /// Slack reserved at build time (`N + B`); once `pairs.len()` reaches
    /// this, the next insert triggers a rebuild (§4.7).
    pub(crate) capacity: usize,
}

/// A tree node: either model-driven or a dense fallback.
pub enum Node<K, V> {
    Model(ModelNode<K, V>),
    Dense(DenseNode<K, V>),
}

impl<K, V> Node<K, V> {
    /// Total live pairs reachable from this node (§3 invariant 2).
    pub fn size_sub_tree(&self) -> usize {
        match self {
            Node::Model(m) => m.size_sub_tree,
            Node::Dense(d) => d.pairs.len(),
        }
    }
}
