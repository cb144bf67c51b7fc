//! Option Exercise Values
//!
//! # Mathematical Definitions
//!
//! - **Put**: max(K - S, 0), right to sell at strike K
//! - **Call**: max(S - K, 0), right to buy at strike K
//!
//! An American option may be exercised at any observation date, so the
//! exercise value is evaluated at arbitrary spots rather than on a terminal
//! price only.

use rayon::prelude::*;
use std::f64;

/// Below this many spots the elementwise evaluation stays sequential.
const PARALLEL_THRESHOLD: usize = 1 << 14;

/// Exercise payoff of a single-asset American option
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payoff {
    /// American put: max(K - S, 0)
    Put { k: f64 },

    /// American call: max(S - K, 0)
    ///
    /// Its exercise boundary is reported as the lowest exercised spot per date.
    Call { k: f64 },
}

impl Payoff {
    pub fn strike(&self) -> f64 {
        match self {
            Payoff::Put { k } | Payoff::Call { k } => *k,
        }
    }

    /// Immediate exercise value at spot `s`
    pub fn intrinsic(&self, s: f64) -> f64 {
        match self {
            Payoff::Put { k } => (k - s).max(0.0),
            Payoff::Call { k } => (s - k).max(0.0),
        }
    }

    /// A path is in the money when exercising now pays strictly positive.
    pub fn is_in_the_money(&self, s: f64) -> bool {
        self.intrinsic(s) > 0.0
    }

    /// Elementwise exercise values over a slice of spots
    pub fn intrinsic_values(&self, spots: &[f64]) -> Vec<f64> {
        if spots.len() >= PARALLEL_THRESHOLD {
            spots.par_iter().map(|&s| self.intrinsic(s)).collect()
        } else {
            spots.iter().map(|&s| self.intrinsic(s)).collect()
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Payoff::Put { .. } => "put",
            Payoff::Call { .. } => "call",
        }
    }
}

impl Default for Payoff {
    fn default() -> Self {
        Payoff::Put { k: 100.0 }
    }
}
