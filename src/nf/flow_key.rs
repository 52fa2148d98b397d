//! Ordered wrapper around `f64`, used as the key type of the transformed
//! index (§4.10: "the index stores the original pair as payload keyed by
//! the transformed scalar").

use std::{cmp::Ordering, fmt, ops::Sub};

use crate::key::Key;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranKey(pub f64);

impl Eq for TranKey {}

impl PartialOrd for TranKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TranKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Sub for TranKey {
    type Output = TranKey;

    fn sub(self, rhs: Self) -> TranKey {
        TranKey(self.0 - rhs.0)
    }
}

impl fmt::Display for TranKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl num_traits::ToPrimitive for TranKey {
    fn to_i64(&self) -> Option<i64> {
        num_traits::ToPrimitive::to_i64(&self.0)
    }

    fn to_u64(&self) -> Option<u64> {
        num_traits::ToPrimitive::to_u64(&self.0)
    }

    fn to_f64(&self) -> Option<f64> {
        Some(self.0)
    }
}

impl num_traits::NumCast for TranKey {
    fn from<T: num_traits::ToPrimitive>(n: T) -> Option<Self> {
        n.to_f64().map(TranKey)
    }
}

impl Key for TranKey {}
