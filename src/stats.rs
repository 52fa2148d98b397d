//! Tree statistics: depth-first walk producing node/bucket/depth counters
//! (§4.11).

use std::{fmt, mem::size_of};

use crate::{
    key::{Key, Value},
    node::{Entry, Node},
};

/// Minimum, maximum, average and percentile of leaf-node depth, in the
/// style of a depth histogram sampled once per leaf reached.
#[derive(Clone)]
pub struct Depth {
    pub samples: usize,
    pub min: usize,
    pub max: usize,
    pub total: usize,
    depths: [u64; 256],
}

impl Depth {
    fn sample(&mut self, depth: usize) {
        let depth = depth.min(255);
        self.samples += 1;
        self.total += depth;
        self.min = self.min.min(depth);
        self.max = self.max.max(depth);
        self.depths[depth] += 1;
    }

    pub fn mean(&self) -> usize {
        if self.samples == 0 {
            0
        } else {
            self.total / self.samples
        }
    }

    /// `(percentile, depth)` pairs from the 91st through 99th percentile.
    pub fn percentiles(&self) -> Vec<(u8, usize)> {
        let mut percentiles = vec![];
        let (mut acc, mut prev_perc) = (0u64, 90u8);
        for (depth, samples) in self.depths.iter().enumerate().filter(|(_, &n)| n > 0) {
            acc += *samples;
            let perc = ((acc as f64 / self.samples as f64) * 100.0) as u8;
            if perc > prev_perc {
                percentiles.push((perc, depth));
                prev_perc = perc;
            }
        }
        percentiles
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth {
            samples: 0,
            min: usize::MAX,
            max: usize::MIN,
            total: 0,
            depths: [0; 256],
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let props: Vec<String> = self
            .percentiles()
            .into_iter()
            .map(|(p, d)| format!(r#""{}"={}"#, p, d))
            .collect();
        write!(
            f,
            "{{ samples={}, min={}, mean={}, max={}, percentiles={{ {} }} }}",
            self.samples,
            self.min,
            self.mean(),
            self.max,
            props.join(", "),
        )
    }
}

/// Counters accumulated by a depth-first walk of an index's tree
/// (`afli.h::collect_tree_statistics`): node/bucket/data counts per
/// storage class, structural and total byte totals, and leaf depths.
#[derive(Default)]
pub struct Stats {
    pub num_model_nodes: usize,
    pub num_dense_nodes: usize,
    pub num_buckets: usize,
    pub num_data_model: usize,
    pub num_data_bucket: usize,
    pub num_data_dense: usize,
    pub num_leaf_nodes: usize,
    /// Structural overhead only: models, bitmaps/tags, bucket/node
    /// headers — no key/value payload.
    pub model_size: usize,
    /// `model_size` plus all stored key/value payload.
    pub index_size: usize,
    pub depths: Depth,
}

impl Stats {
    pub fn bucket_size(&self) -> usize {
        self.num_data_bucket
            .checked_div(self.num_buckets.max(1))
            .unwrap_or(0)
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "afli = {{ model_nodes={}, dense_nodes={}, buckets={}, leaf_nodes={} }}",
            self.num_model_nodes, self.num_dense_nodes, self.num_buckets, self.num_leaf_nodes,
        )?;
        writeln!(
            f,
            "afli.data = {{ in_model={}, in_bucket={}, in_dense={} }}",
            self.num_data_model, self.num_data_bucket, self.num_data_dense,
        )?;
        writeln!(
            f,
            "afli.size = {{ model_size={}, index_size={} }}",
            self.model_size, self.index_size
        )?;
        write!(f, "afli.depths = {}", self.depths)
    }
}

/// Walk the subtree rooted at `node`, accumulating into `stats`. Returns
/// the number of conflicts contributed by this subtree, mirroring
/// `collect_tree_statistics`'s return value (used only internally to
/// compute average per-node conflict counts, which this port omits from
/// the public `Stats` in favor of the depth histogram).
pub fn collect<K: Key, V: Value>(node: &Node<K, V>, depth: usize, stats: &mut Stats) {
    match node {
        Node::Model(m) => {
            stats.num_model_nodes += 1;
            let struct_bytes = size_of::<K>() + size_of::<f64>() * 2;
            stats.model_size += struct_bytes;
            stats.index_size += struct_bytes + size_of::<(K, V)>() * m.capacity();

            let mut is_leaf = true;
            let entries = &m.entries;
            let mut i = 0;
            while i < entries.len() {
                match &entries[i] {
                    Entry::Empty => i += 1,
                    Entry::Data(..) => {
                        stats.num_data_model += 1;
                        stats.depths.sample(depth);
                        i += 1;
                    }
                    Entry::Bucket(b) => {
                        stats.num_buckets += 1;
                        stats.num_data_bucket += b.len();
                        stats.model_size += size_of::<usize>();
                        stats.index_size += size_of::<usize>() + size_of::<(K, V)>() * b.capacity();
                        stats.depths.sample(depth + 1);
                        i += 1;
                    }
                    Entry::Child(child) => {
                        collect(&child.borrow(), depth + 1, stats);
                        is_leaf = false;
                        // Skip the rest of this aggregation's alias run —
                        // they point at the child we just counted.
                        let mut j = i + 1;
                        while j < entries.len() && entries[j].aliases(&entries[i]) {
                            j += 1;
                        }
                        i = j;
                    }
                }
            }
            if is_leaf {
                stats.num_leaf_nodes += 1;
            }
        }
        Node::Dense(d) => {
            stats.num_dense_nodes += 1;
            stats.num_data_dense += d.pairs.len();
            stats.num_leaf_nodes += 1;
            stats.model_size += size_of::<usize>() * 2;
            stats.index_size += size_of::<usize>() * 2 + size_of::<(K, V)>() * d.capacity;
            stats.depths.sample(depth);
        }
    }
}
