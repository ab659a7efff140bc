//! Periodic spatial coupling kernel
//!
//! A weighted local average of a field over a ring: indices wrap modulo the
//! lattice length, so there is no boundary case — cell 0's left neighbor is
//! cell N-1 and cell N-1's right neighbor is cell 0.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RingwaveError};

/// Symmetric coupling weights, validated at construction
///
/// The canonical stencil is `[0.25, 0.5, 0.25]` (sums to 1). The weight sum
/// is cached so the per-cell average never re-reduces the weight vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stencil {
    weights: Vec<f64>,
    sum: f64,
}

impl Stencil {
    /// Build a stencil, rejecting empty or zero-sum weights
    pub fn new(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(RingwaveError::EmptyStencil);
        }
        let sum: f64 = weights.iter().sum();
        if sum == 0.0 {
            return Err(RingwaveError::ZeroSumStencil);
        }
        Ok(Self {
            weights: weights.to_vec(),
            sum,
        })
    }

    /// The canonical `[0.25, 0.5, 0.25]` stencil
    pub fn canonical() -> Self {
        Self {
            weights: crate::config::CANONICAL_STENCIL.to_vec(),
            sum: 1.0,
        }
    }

    /// Weight values
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weighted circular average of `field` centered on `index`
    ///
    /// Computes `sum_j weights[j] * field[(index - center + j) mod N]`
    /// divided by the weight sum, with `center = len / 2`. Pure: no side
    /// effects, result depends only on the inputs.
    pub fn local_average(&self, field: &[f64], index: usize) -> f64 {
        let n = field.len() as isize;
        let center = (self.weights.len() / 2) as isize;
        let mut acc = 0.0;
        for (j, &w) in self.weights.iter().enumerate() {
            let i = (index as isize + j as isize - center).rem_euclid(n) as usize;
            acc += w * field[i];
        }
        acc / self.sum
    }
}

impl Default for Stencil {
    fn default() -> Self {
        Self::canonical()
    }
}
