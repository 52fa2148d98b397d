//! AFLI is a learned in-memory ordered key-value index: instead of a
//! comparison-based tree, each node fits a linear model over its slice of
//! `(key, rank)` pairs and uses the model's prediction as a direct index
//! into a slot array, falling back to conflict-resolution buckets or a
//! recursive child node wherever the model's prediction space is too
//! crowded for a one-shot slot assignment.
//!
//! A node is either:
//! - a [`model node`](node::ModelNode), carrying a fitted
//!   [`LinearModel`](model::LinearModel) and a tagged slot array
//!   ([`Entry`](node::Entry)) of empty slots, direct data, conflict
//!   buckets, or child nodes; or
//! - a [`dense node`](node::DenseNode), a plain sorted array used
//!   wherever no useful linear model could be fit.
//!
//! [`Afli`] is the top-level façade: [`Afli::bulk_load`] builds a tree
//! from a sorted batch, and [`Afli::find`]/[`Afli::update`]/
//! [`Afli::insert`]/[`Afli::remove`] read and mutate it afterward.
//!
//! On top of the core index, [`nf::Nfl`] optionally reshapes the key
//! distribution through a pre-trained numerical-flow transform before
//! indexing, switching itself on only when doing so measurably reduces
//! tail conflicts.

pub mod error;

pub mod bucket;
pub mod conflicts;
pub mod config;
pub mod index;
pub mod key;
pub mod model;
pub mod nf;
pub mod node;
pub mod stats;
pub mod workload;

pub use crate::config::Config;
pub use crate::error::{Error, Kind, Result};
pub use crate::index::Afli;
pub use crate::key::{Key, Value};
pub use crate::nf::Nfl;
pub use crate::stats::Stats;
