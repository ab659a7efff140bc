//! Three-field lattice state
//!
//! Every cell splits into three fractions forming a closed cycle:
//! ready → active → resting → ready. The fields live in one aggregate with
//! equal lengths enforced at construction, so the per-cell conservation
//! invariant (`ready + active + resting == 1`) is explicit rather than
//! scattered across independently-keyed containers.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RingwaveError};

/// Per-cell fractions of the three coupled states
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediumState {
    /// Fraction capable of activating
    pub ready: Vec<f64>,
    /// Fraction currently excited
    pub active: Vec<f64>,
    /// Fraction in post-excitation refractory recovery
    pub resting: Vec<f64>,
}

impl MediumState {
    /// Build a state from explicit fields, enforcing equal lengths
    pub fn new(ready: Vec<f64>, active: Vec<f64>, resting: Vec<f64>) -> Result<Self> {
        if ready.len() != active.len() || ready.len() != resting.len() {
            return Err(RingwaveError::FieldLengthMismatch {
                ready: ready.len(),
                active: active.len(),
                resting: resting.len(),
            });
        }
        Ok(Self {
            ready,
            active,
            resting,
        })
    }

    /// All cells fully ready (the standard pre-seed initial condition)
    pub fn all_ready(cells: usize) -> Self {
        Self {
            ready: vec![1.0; cells],
            active: vec![0.0; cells],
            resting: vec![0.0; cells],
        }
    }

    /// Number of cells on the ring
    pub fn len(&self) -> usize {
        self.ready.len()
    }

    /// True when the lattice has no cells
    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }

    /// Worst per-cell deviation of `ready + active + resting` from 1
    ///
    /// Feeds the drift diagnostic; the kinetics conserve the sum exactly,
    /// so any deviation is integration error.
    pub fn max_sum_deviation(&self) -> f64 {
        let mut worst: f64 = 0.0;
        for i in 0..self.len() {
            let dev = (self.ready[i] + self.active[i] + self.resting[i] - 1.0).abs();
            worst = worst.max(dev);
        }
        worst
    }
}

/// Per-cell instantaneous rates of change for all three fields
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDelta {
    pub d_ready: Vec<f64>,
    pub d_active: Vec<f64>,
    pub d_resting: Vec<f64>,
}

impl FieldDelta {
    /// All-zero delta for a lattice of `cells` cells
    pub fn zeros(cells: usize) -> Self {
        Self {
            d_ready: vec![0.0; cells],
            d_active: vec![0.0; cells],
            d_resting: vec![0.0; cells],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ready_conserves() {
        let state = MediumState::all_ready(8);
        assert_eq!(state.len(), 8);
        assert!(state.max_sum_deviation() < 1e-15);
    }

    #[test]
    fn test_rejects_unequal_fields() {
        let result = MediumState::new(vec![1.0; 3], vec![0.0; 4], vec![0.0; 3]);
        assert!(matches!(
            result,
            Err(RingwaveError::FieldLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_sum_deviation_reports_worst_cell() {
        let state = MediumState::new(
            vec![0.5, 0.2],
            vec![0.5, 0.2],
            vec![0.0, 0.2], // second cell sums to 0.6
        )
        .unwrap();
        assert!((state.max_sum_deviation() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_state_serialization() {
        let state = MediumState::all_ready(5);
        let json = serde_json::to_string(&state).unwrap();
        let restored: MediumState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
