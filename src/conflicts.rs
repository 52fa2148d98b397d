//! Conflict analysis over a sorted batch and a fitted model (§4.2).

use crate::{
    key::Key,
    model::{self, LinearModel},
};

/// One `(slot position, collision count)` pair, in strictly increasing
/// position order, as produced by [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub position: usize,
    pub count: usize,
}

/// Outcome of fitting a model and walking the batch once to group
/// same-slot runs.
pub struct ConflictsInfo {
    pub model: LinearModel,
    pub slot_space: usize,
    pub conflicts: Vec<Conflict>,
}

/// Fit a model to `keys` (size-amplification `size_amp`) and partition the
/// batch into same-slot runs. Returns `None` if no model could be fit,
/// signalling "build a dense node instead".
pub fn analyze<K: Key>(keys: &[K], size_amp: f64) -> Option<ConflictsInfo> {
    let fitted = model::fit_with_amp(keys, size_amp)?;
    let model = fitted.model;
    let slot_space = fitted.slot_space;

    let mut conflicts = Vec::new();
    let mut pos_last = model.predict_clamped(keys[0], slot_space);
    let mut count = 1usize;
    for key in &keys[1..] {
        let pos = model.predict_clamped(*key, slot_space);
        if pos == pos_last {
            count += 1;
        } else {
            conflicts.push(Conflict {
                position: pos_last,
                count,
            });
            pos_last = pos;
            count = 1;
        }
    }
    conflicts.push(Conflict {
        position: pos_last,
        count,
    });

    Some(ConflictsInfo {
        model,
        slot_space,
        conflicts,
    })
}

/// The 99th-percentile collision count over `keys`' predicted-slot
/// histogram, minus one (§4.9's "tail conflict"). Returns `0` if no model
/// could be fit or there were no collisions recorded.
pub fn tail_conflicts<K: Key>(keys: &[K], size_amp: f64) -> u32 {
    let info = match analyze(keys, size_amp) {
        Some(info) => info,
        None => return 0,
    };
    if info.conflicts.is_empty() {
        return 0;
    }
    let mut counts: Vec<usize> = info.conflicts.iter().map(|c| c.count).collect();
    counts.sort_unstable();
    let rank = ((counts.len() as f64) * 0.99) as usize;
    let rank = rank.max(1) - 1;
    (counts[rank] as u32).saturating_sub(1)
}

#[cfg(test)]
#[path = "conflicts_test.rs"]
mod conflicts_test;
