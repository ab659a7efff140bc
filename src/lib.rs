//! # Ringwave - Excitable 1-D Ring Medium
//!
//! Simulates a ring of cells whose three coupled state fractions (ready,
//! active, resting) evolve under local diffusive coupling and first-order
//! kinetic transitions — wave propagation and refractory behavior of a
//! cardiac-tissue-like excitable medium.
//!
//! ## Core Components
//!
//! - **Stencil**: weighted circular local average (periodic boundary)
//! - **RateConstants / derivative**: conserved three-state kinetics
//! - **Integrator**: explicit forward-Euler stepping, optional periodic
//!   stimulus pulses at the probe cell
//! - **Sampler / History**: time-stamped deep-copy snapshots
//! - **Simulation**: one runnable unit (domain + constants + history)
//! - **Scan**: Cartesian-product sweep over rate-constant grids, sequential
//!   or across a rayon pool
//!
//! ## Design Principles
//!
//! - **Conservation by construction**: every kinetic outflow is another
//!   field's inflow; drift beyond tolerance is logged, never corrected
//! - **Validate once**: configuration is checked at construction, the step
//!   loop is total arithmetic with no failure path
//! - **Deterministic**: no randomness; sequential and parallel sweeps are
//!   bit-for-bit reproducible
//! - **In-memory boundary**: histories and scan records are the only
//!   outputs; plotting and drivers live outside this crate
//!
//! ## Example
//!
//! ```
//! use ringwave::{RateConstants, SimConfig, Simulation};
//!
//! let config = SimConfig::from_length(10.0, 0.1).with_duration(200.0);
//! let mut sim = Simulation::new(config, RateConstants::default())?;
//! let probe = sim.probe();
//! let history = sim.run();
//! let midpoint_series = history.series_at(probe);
//! # assert!(!midpoint_series.is_empty());
//! # Ok::<(), ringwave::RingwaveError>(())
//! ```

// Configuration (validated once, immutable during a run)
pub mod config;
pub use config::{SimConfig, StimulusConfig, CANONICAL_STENCIL, SEED_PEAK};

// Excitable medium core: kernel, kinetics, integrator, sampler, simulation
pub mod medium;
pub use medium::{
    derivative, pulse, FieldDelta, History, Integrator, MediumState, RateConstants, Sampler,
    Simulation, Snapshot, Stencil,
};

// Parameter sweeps
pub mod scan;
pub use scan::{ParamGrid, Scan, ScanRecord, ScanResult};

// Error types
mod error;
pub use error::{Result, RingwaveError};
