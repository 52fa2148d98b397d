//! Concrete feed-forward tanh network driving the numerical-flow
//! transform (§6 "flow weights file format"; original source
//! `models/bnaf.h`, `models/numerical_flow.h`).
//!
//! Treated by the design as an external collaborator specified only at
//! its interface; this is the minimal working implementation needed to
//! run the transform end-to-end, not a subject of the core's invariants.

use std::{
    io::{BufRead, BufReader, Read},
    path::Path,
};

use crate::{
    err_at,
    error::{Error, Kind, Result},
};

struct Layer {
    rows: usize,
    cols: usize,
    weights: Vec<f64>,
}

impl Layer {
    /// `input` (length `rows`) times this layer's matrix, yielding a
    /// vector of length `cols`.
    fn apply(&self, input: &[f64]) -> Vec<f64> {
        debug_assert_eq!(input.len(), self.rows);
        let mut out = vec![0.0; self.cols];
        for (i, &x) in input.iter().enumerate() {
            if x == 0.0 {
                continue;
            }
            let row = &self.weights[i * self.cols..(i + 1) * self.cols];
            for (o, w) in out.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        out
    }
}

/// A fixed-architecture feed-forward network: `tanh` between linear
/// layers, `in_dim ∈ {1,2,4}` feature-splitting on the raw (normalized)
/// key, final layer's output summed across its `in_dim` components.
pub struct FeedForwardFlow {
    in_dim: usize,
    mean: f64,
    var: f64,
    layers: Vec<Layer>,
}

impl FeedForwardFlow {
    /// Load a flow from the weights file format documented in §6.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = err_at!(IOError, std::fs::File::open(path))?;
        let mut tokens = Tokenizer::new(file)?;

        let in_dim = tokens.next_usize()?;
        let hidden_dim = tokens.next_usize()?;
        let num_layers = tokens.next_usize()?;
        if !matches!(in_dim, 1 | 2 | 4) || num_layers < 2 {
            return err_at!(
                InvalidFormat,
                msg: "unsupported flow architecture in_dim={} num_layers={}", in_dim, num_layers
            );
        }
        let mean = tokens.next_f64()?;
        let var = tokens.next_f64()?;

        let mut layers = Vec::with_capacity(num_layers);
        for l in 0..num_layers {
            let rows = tokens.next_usize()?;
            let cols = tokens.next_usize()?;
            let expected_rows = if l == 0 {
                in_dim
            } else {
                hidden_dim
            };
            let expected_cols = if l == num_layers - 1 { in_dim } else { hidden_dim };
            if rows != expected_rows || cols != expected_cols {
                return err_at!(
                    InvalidFormat,
                    msg: "layer {} shape {}x{} does not match architecture", l, rows, cols
                );
            }
            let mut weights = Vec::with_capacity(rows * cols);
            for _ in 0..rows * cols {
                weights.push(tokens.next_f64()?);
            }
            layers.push(Layer { rows, cols, weights });
        }

        Ok(FeedForwardFlow { in_dim, mean, var, layers })
    }

    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    /// Approximate structural + weight footprint, in bytes.
    pub fn size(&self) -> usize {
        let weights: usize = self
            .layers
            .iter()
            .map(|l| l.weights.len() * std::mem::size_of::<f64>())
            .sum();
        std::mem::size_of::<Self>() + weights
    }

    /// Transform one raw key into its flow-mapped scalar.
    pub fn transform(&self, key: f64) -> f64 {
        let normalized = (key - self.mean) / self.var;
        let mut input = self.split_features(normalized);

        for (i, layer) in self.layers.iter().enumerate() {
            input = layer.apply(&input);
            if i + 1 < self.layers.len() {
                for x in input.iter_mut() {
                    *x = x.tanh();
                }
            }
        }
        input.into_iter().sum()
    }

    /// Transform a whole batch, amortizing nothing beyond what plain
    /// iteration gives us — there is no BLAS dependency here (see
    /// DESIGN.md).
    pub fn transform_batch(&self, keys: &[f64]) -> Vec<f64> {
        keys.iter().map(|&k| self.transform(k)).collect()
    }

    fn split_features(&self, normalized: f64) -> Vec<f64> {
        match self.in_dim {
            1 => vec![normalized],
            2 => vec![normalized, normalized - normalized.floor()],
            4 => {
                let whole = normalized.floor();
                let frac = (normalized - whole) * 1_000_000.0;
                let frac_whole = frac.floor();
                let frac_frac = frac - frac_whole;
                vec![normalized, whole, frac_whole, frac_frac]
            }
            _ => unreachable!("validated at load time"),
        }
    }
}

/// Minimal whitespace tokenizer over the weights file (§6): numbers may be
/// split across any number of lines.
struct Tokenizer {
    tokens: std::vec::IntoIter<String>,
}

impl Tokenizer {
    fn new<R: Read>(reader: R) -> Result<Self> {
        let mut tokens = Vec::new();
        let buffered = BufReader::new(reader);
        for line in buffered.lines() {
            let line = err_at!(IOError, line)?;
            tokens.extend(line.split_whitespace().map(str::to_string));
        }
        Ok(Tokenizer {
            tokens: tokens.into_iter(),
        })
    }

    fn next_token(&mut self) -> Result<String> {
        self.tokens
            .next()
            .ok_or_else(|| Error(Kind::InvalidFormat, "unexpected end of flow weights file".to_string()))
    }

    fn next_usize(&mut self) -> Result<usize> {
        let tok = self.next_token()?;
        err_at!(InvalidFormat, tok.parse::<usize>())
    }

    fn next_f64(&mut self) -> Result<f64> {
        let tok = self.next_token()?;
        err_at!(InvalidFormat, tok.parse::<f64>())
    }
}
