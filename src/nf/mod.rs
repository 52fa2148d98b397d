//! Numerical-flow wrapper and auto-switch policy (§4.10).

mod flow;
mod flow_key;

pub use flow::FeedForwardFlow;
pub use flow_key::TranKey;

use std::path::Path;

use crate::{
    conflicts,
    error::Result,
    index::Afli,
    key::{Key, Value},
    stats::Stats,
};

const RAW_SIZE_AMPLIFICATION: f64 = 1.5;
const CONFLICTS_DECAY: f64 = 0.1;

/// Wraps an [`Afli`] with an optional numerical-flow key transform,
/// deciding once (via [`Nfl::auto_switch`]) whether the transformed or the
/// raw key space indexes better.
pub struct Nfl<K, V> {
    flow: FeedForwardFlow,
    batch_size: usize,
    enable_flow: bool,
    raw_index: Option<Afli<K, V>>,
    tran_index: Option<Afli<TranKey, (K, V)>>,
    raw_batch: Vec<(K, V)>,
    tran_batch: Vec<(TranKey, (K, V))>,
}

impl<K: Key, V: Value> Nfl<K, V> {
    /// Load the transform's weights and default to flow enabled until
    /// [`Nfl::auto_switch`] runs.
    pub fn new<P: AsRef<Path>>(weights_path: P, batch_size: usize) -> Result<Self> {
        Ok(Nfl {
            flow: FeedForwardFlow::load(weights_path)?,
            batch_size,
            enable_flow: true,
            raw_index: None,
            tran_index: None,
            raw_batch: Vec::new(),
            tran_batch: Vec::new(),
        })
    }

    pub fn set_batch_size(&mut self, batch_size: usize) {
        self.batch_size = batch_size;
    }

    /// Compare raw-key vs. transformed-key tail conflicts (§4.10) and
    /// decide whether to route bulk-load and subsequent ops through the
    /// flow. Returns the winning tail-conflict count, which the caller
    /// passes straight through to [`Nfl::bulk_load`] as the bucket-size
    /// hyper-parameter — mirroring the original's reuse of the auto-switch
    /// result as `AFLI::BulkLoad`'s `bucket_size` argument.
    pub fn auto_switch(&mut self, pairs: &[(K, V)]) -> u32 {
        let raw_keys: Vec<K> = pairs.iter().map(|(k, _)| *k).collect();
        let raw_tail = conflicts::tail_conflicts(&raw_keys, RAW_SIZE_AMPLIFICATION);

        let tran_values: Vec<f64> = self
            .flow
            .transform_batch(&raw_keys.iter().map(Key::as_f64).collect::<Vec<_>>());
        let mut tran_pairs: Vec<(TranKey, (K, V))> = tran_values
            .into_iter()
            .zip(pairs.iter().copied())
            .map(|(t, (k, v))| (TranKey(t), (k, v)))
            .collect();
        tran_pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let tran_keys: Vec<TranKey> = tran_pairs.iter().map(|(t, _)| *t).collect();
        let tran_tail = conflicts::tail_conflicts(&tran_keys, RAW_SIZE_AMPLIFICATION);

        let decayed_enough = (raw_tail as f64 - tran_tail as f64) >= CONFLICTS_DECAY * raw_tail as f64;
        if tran_tail < raw_tail && decayed_enough {
            self.enable_flow = true;
            self.tran_batch = tran_pairs;
            tran_tail
        } else {
            self.enable_flow = false;
            raw_tail
        }
    }

    /// Build the inner index. `bucket_size` is normally the value
    /// returned from [`Nfl::auto_switch`].
    pub fn bulk_load(&mut self, pairs: &[(K, V)], bucket_size: usize, aggregate_size: usize) {
        if self.enable_flow {
            let mut tran_pairs = std::mem::take(&mut self.tran_batch);
            if tran_pairs.is_empty() {
                tran_pairs = self.transform_to_tran_pairs(pairs);
            }
            let mut index = Afli::new();
            index.bulk_load(&tran_pairs, Some(bucket_size), aggregate_size);
            self.tran_index = Some(index);
        } else {
            let mut index = Afli::new();
            index.bulk_load(pairs, Some(bucket_size), aggregate_size);
            self.raw_index = Some(index);
        }
    }

    fn transform_to_tran_pairs(&self, pairs: &[(K, V)]) -> Vec<(TranKey, (K, V))> {
        let mut tran_pairs: Vec<(TranKey, (K, V))> = pairs
            .iter()
            .map(|&(k, v)| (TranKey(self.flow.transform(k.as_f64())), (k, v)))
            .collect();
        tran_pairs.sort_by(|a, b| a.0.cmp(&b.0));
        tran_pairs
    }

    /// Populate the internal per-batch buffer. Must be called once per
    /// batch before any of `find`/`update`/`remove`/`insert`, whose `idx`
    /// argument then indexes into this batch rather than being a key
    /// (§6 "NF wrapper API").
    pub fn transform(&mut self, batch: &[(K, V)]) {
        if self.enable_flow {
            self.tran_batch = self.transform_to_tran_pairs(batch);
        } else {
            self.raw_batch = batch.to_vec();
        }
    }

    pub fn find(&self, idx_in_batch: usize) -> Option<V> {
        if self.enable_flow {
            let (tk, _) = self.tran_batch[idx_in_batch];
            self.tran_index.as_ref().and_then(|idx| idx.find(tk)).map(|(_, v)| v)
        } else {
            let (k, _) = self.raw_batch[idx_in_batch];
            self.raw_index.as_ref().and_then(|idx| idx.find(k))
        }
    }

    pub fn update(&mut self, idx_in_batch: usize) -> bool {
        if self.enable_flow {
            let (tk, pair) = self.tran_batch[idx_in_batch];
            self.tran_index.as_mut().map_or(false, |idx| idx.update(tk, pair))
        } else {
            let (k, v) = self.raw_batch[idx_in_batch];
            self.raw_index.as_mut().map_or(false, |idx| idx.update(k, v))
        }
    }

    pub fn remove(&mut self, idx_in_batch: usize) -> usize {
        if self.enable_flow {
            let (tk, _) = self.tran_batch[idx_in_batch];
            self.tran_index.as_mut().map_or(0, |idx| idx.remove(tk))
        } else {
            let (k, _) = self.raw_batch[idx_in_batch];
            self.raw_index.as_mut().map_or(0, |idx| idx.remove(k))
        }
    }

    pub fn insert(&mut self, idx_in_batch: usize) {
        if self.enable_flow {
            let (tk, pair) = self.tran_batch[idx_in_batch];
            if let Some(idx) = self.tran_index.as_mut() {
                idx.insert(tk, pair);
            }
        } else {
            let (k, v) = self.raw_batch[idx_in_batch];
            if let Some(idx) = self.raw_index.as_mut() {
                idx.insert(k, v);
            }
        }
    }

    /// Counts the flow's weights only while `enable_flow` is set, even
    /// though the weights stay resident either way — matches
    /// `nfl.h`'s accounting, which ties `flow_`'s footprint to whichever
    /// index is actually in use rather than to the transform's presence.
    pub fn model_size(&self) -> usize {
        let inner = if self.enable_flow {
            self.tran_index.as_ref().map_or(0, Afli::model_size)
        } else {
            self.raw_index.as_ref().map_or(0, Afli::model_size)
        };
        let flow_size = if self.enable_flow { self.flow.size() } else { 0 };
        std::mem::size_of::<Self>() + inner + flow_size
    }

    pub fn index_size(&self) -> usize {
        let inner = if self.enable_flow {
            self.tran_index.as_ref().map_or(0, Afli::index_size)
        } else {
            self.raw_index.as_ref().map_or(0, Afli::index_size)
        };
        let flow_size = if self.enable_flow { self.flow.size() } else { 0 };
        let batch_footprint = if self.enable_flow {
            std::mem::size_of::<(TranKey, (K, V))>() * self.batch_size
        } else {
            std::mem::size_of::<(K, V)>() * self.batch_size
        };
        std::mem::size_of::<Self>() + inner + flow_size + batch_footprint
    }

    pub fn to_stats(&self) -> Stats {
        if self.enable_flow {
            self.tran_index.as_ref().map_or_else(Stats::default, Afli::to_stats)
        } else {
            self.raw_index.as_ref().map_or_else(Stats::default, Afli::to_stats)
        }
    }

    pub fn enabled(&self) -> bool {
        self.enable_flow
    }

    /// True until [`Nfl::bulk_load`] has built an inner index.
    pub fn is_empty(&self) -> bool {
        match (&self.raw_index, &self.tran_index) {
            (Some(idx), _) => idx.is_empty(),
            (_, Some(idx)) => idx.is_empty(),
            (None, None) => true,
        }
    }
}

#[cfg(test)]
#[path = "nf_test.rs"]
mod nf_test;
