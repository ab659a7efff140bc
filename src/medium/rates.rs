//! Reaction kinetics
//!
//! First-order transitions around the ready → active → resting → ready
//! cycle. Activation is the only spatially coupled term: it scales with the
//! local active-neighborhood average from the stencil, so excitation spreads
//! to ready neighbors. Each transition rate appears exactly once as inflow
//! and once as outflow across the three equations, which conserves the
//! per-cell sum in continuous time. Fully deterministic.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RingwaveError};
use crate::medium::kernel::Stencil;
use crate::medium::state::{FieldDelta, MediumState};

/// Transition rate constants, uniform across the lattice and over time
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateConstants {
    /// ready → active, modulated by local active-neighborhood density
    pub k_activation: f64,
    /// active → resting
    pub k_deactivation: f64,
    /// resting → ready
    pub k_recovery: f64,
}

impl RateConstants {
    /// Build a rate triple, rejecting negative values
    pub fn new(k_activation: f64, k_deactivation: f64, k_recovery: f64) -> Result<Self> {
        for (name, value) in [
            ("k_activation", k_activation),
            ("k_deactivation", k_deactivation),
            ("k_recovery", k_recovery),
        ] {
            if value < 0.0 {
                return Err(RingwaveError::NegativeRateConstant { name, value });
            }
        }
        Ok(Self {
            k_activation,
            k_deactivation,
            k_recovery,
        })
    }

    /// The triple as `(k_activation, k_deactivation, k_recovery)`
    pub fn as_triple(&self) -> (f64, f64, f64) {
        (self.k_activation, self.k_deactivation, self.k_recovery)
    }
}

impl Default for RateConstants {
    /// Reference parameterization: a medium that excites fast, deactivates
    /// moderately, and recovers slowly (long refractory tail)
    fn default() -> Self {
        Self {
            k_activation: 10.0,
            k_deactivation: 3.0,
            k_recovery: 0.1,
        }
    }
}

/// Instantaneous rate of change of all three fields at every cell
///
/// For each cell i:
/// - `a = local_average(active, i)` — diffused excitation pressure
/// - `activation = k_activation * ready[i] * a`
/// - `deactivation = k_deactivation * active[i]`
/// - `recovery = k_recovery * resting[i]`
///
/// then `d_active = activation - deactivation`,
/// `d_resting = deactivation - recovery`,
/// `d_ready = recovery - activation`.
pub fn derivative(state: &MediumState, constants: &RateConstants, stencil: &Stencil) -> FieldDelta {
    let n = state.len();
    let mut delta = FieldDelta::zeros(n);

    for i in 0..n {
        let neighbor_active = stencil.local_average(&state.active, i);

        let activation = constants.k_activation * state.ready[i] * neighbor_active;
        let deactivation = constants.k_deactivation * state.active[i];
        let recovery = constants.k_recovery * state.resting[i];

        delta.d_active[i] = activation - deactivation;
        delta.d_resting[i] = deactivation - recovery;
        delta.d_ready[i] = recovery - activation;
    }

    delta
}
