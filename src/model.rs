//! Linear model fitting (§4.1 of the design notes).

use crate::key::Key;

/// `position ≈ slope·key + intercept`, fit over a sorted batch.
#[derive(Debug, Clone, Copy)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    /// Predict a slot index for `key`, truncating towards negative infinity.
    pub fn predict<K: Key>(&self, key: K) -> i64 {
        (self.slope * key.as_f64() + self.intercept).floor() as i64
    }

    /// [`Self::predict`] clamped into `[0, capacity - 1]`.
    pub fn predict_clamped<K: Key>(&self, key: K, capacity: usize) -> usize {
        let p = self.predict(key);
        p.clamp(0, capacity as i64 - 1) as usize
    }
}

/// Accumulates the ordinary-least-squares sums needed to fit a
/// [`LinearModel`] over `(key, rank)` pairs, where `rank` is the key's
/// position in the sorted batch (not a rescaled coordinate).
#[derive(Debug, Default)]
struct ModelBuilder {
    n: f64,
    sum_x: f64,
    sum_y: f64,
    sum_xy: f64,
    sum_xx: f64,
}

impl ModelBuilder {
    fn add(&mut self, x: f64, y: f64) {
        self.n += 1.0;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xy += x * y;
        self.sum_xx += x * x;
    }

    /// Ordinary least squares closed form. Returns `None` if the
    /// denominator is too close to zero to trust (a constant or
    /// near-constant `x`).
    fn build(&self) -> Option<LinearModel> {
        let denom = self.n * self.sum_xx - self.sum_x * self.sum_x;
        if denom.abs() < 1e-9 {
            return None;
        }
        let slope = (self.n * self.sum_xy - self.sum_x * self.sum_y) / denom;
        let intercept = (self.sum_y - slope * self.sum_x) / self.n;
        Some(LinearModel { slope, intercept })
    }
}

/// Result of fitting a model to a sorted batch: the model itself (if
/// fittable) and the slot-space size `M` it was fit to predict into.
pub struct FittedModel {
    pub model: LinearModel,
    pub slot_space: usize,
}

/// Fit a [`LinearModel`] to a sorted, unique batch of keys.
///
/// `size_amp` is the size-amplification hyper-parameter `A` (§4.1): the
/// model predicts into a slot space of roughly `size * size_amp` slots.
/// Returns `None` if no model can be fit (constant key, or a degenerate
/// slope of zero), signalling that the caller should fall back to a dense
/// node.
pub fn fit<K: Key>(keys: &[K]) -> Option<FittedModel> {
    fit_with_amp(keys, 2.0)
}

/// Same as [`fit`] but with an explicit size-amplification factor, used by
/// the bucket-size auto-compute (§4.9, `A = 2.0`) and the NF auto-switch
/// comparison (§4.10, `A = 1.5`).
pub fn fit_with_amp<K: Key>(keys: &[K], size_amp: f64) -> Option<FittedModel> {
    let size = keys.len();
    if size == 0 {
        return None;
    }
    let min_key = keys[0];
    let max_key = keys[size - 1];
    if min_key == max_key {
        return None;
    }

    let mut builder = ModelBuilder::default();
    for (i, k) in keys.iter().enumerate() {
        builder.add(k.as_f64(), i as f64);
    }
    let mut model = builder.build()?;
    if model.slope == 0.0 {
        return None;
    }

    model.intercept = -model.slope * min_key.as_f64() + 0.5;

    let mut max_size = (size as f64 * size_amp) as i64;
    let predicted_size = model.predict(max_key) + 1;
    if predicted_size > 1 {
        max_size = max_size.min(predicted_size);
    }
    let max_size = max_size.max(1) as usize;

    let first_pos = model.predict_clamped(min_key, max_size);
    let last_pos = model.predict_clamped(max_key, max_size);
    if first_pos == last_pos {
        // All predicted positions round to the same slot; re-derive a
        // model that spans the full output range linearly in key space.
        model.slope = size as f64 / (max_key.as_f64() - min_key.as_f64());
        model.intercept = -model.slope * min_key.as_f64() + 0.5;
    }

    Some(FittedModel {
        model,
        slot_space: max_size,
    })
}

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;
