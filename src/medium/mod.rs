//! # Excitable medium core
//!
//! The numerical engine for a ring of cells in three coupled states.
//!
//! ## Components
//!
//! - **Kernel** (`Stencil`): weighted circular 3-point average of the
//!   active field (periodic boundary, no edge cases)
//! - **RateModel** (`rates`): conserved three-state kinetics
//!   (ready → active → resting → ready)
//! - **Integrator**: explicit forward-Euler stepping with an optional
//!   periodic stimulus at the probe cell
//! - **Sampler**: deep-copied, time-stamped snapshots at a fixed cadence
//! - **Simulation**: the composed runnable unit
//!
//! ## Invariant
//!
//! For every cell, `ready + active + resting == 1` to within integration
//! error: each kinetic term is an outflow of one field and the inflow of
//! another, so no mass is created or destroyed. The integrator reports
//! (never corrects) any drift beyond the configured tolerance.

mod kernel;
pub use kernel::Stencil;

mod state;
pub use state::{FieldDelta, MediumState};

mod rates;
pub use rates::{derivative, RateConstants};

mod integrator;
pub use integrator::{pulse, Integrator};

mod sampler;
pub use sampler::{History, Sampler, Snapshot};

mod simulation;
pub use simulation::Simulation;
