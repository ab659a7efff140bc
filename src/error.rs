//! Error types for ringwave

use thiserror::Error;

/// Ringwave error type
///
/// Every variant is a configuration error raised at construction time,
/// before any simulation step executes. The numeric core (kernel, rates,
/// integrator) is total over well-formed input and has no failure path.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RingwaveError {
    /// Domain has no cells
    #[error("invalid domain: cell count must be positive (got {0})")]
    InvalidDomain(usize),

    /// Non-positive time step
    #[error("invalid time step: dt must be positive (got {0})")]
    InvalidTimeStep(f64),

    /// Stencil weights sum to zero (division by zero in the local average)
    #[error("invalid stencil: weights sum to zero")]
    ZeroSumStencil,

    /// Empty stencil
    #[error("invalid stencil: no weights")]
    EmptyStencil,

    /// Negative rate constant
    #[error("invalid rate constant: {name} must be non-negative (got {value})")]
    NegativeRateConstant { name: &'static str, value: f64 },

    /// Zero sampling period
    #[error("invalid sampling period: must be at least 1 step")]
    InvalidSamplePeriod,

    /// Stimulus period shorter than one step, or peak outside (0, 1]
    #[error("invalid stimulus: {0}")]
    InvalidStimulus(String),

    /// Probe index outside the lattice
    #[error("probe cell {probe} out of range for {cells} cells")]
    ProbeOutOfRange { probe: usize, cells: usize },

    /// State fields of unequal length
    #[error("field length mismatch: ready={ready}, active={active}, resting={resting}")]
    FieldLengthMismatch {
        ready: usize,
        active: usize,
        resting: usize,
    },
}

pub type Result<T> = std::result::Result<T, RingwaveError>;
