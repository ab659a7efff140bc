//! One runnable simulation
//!
//! Composes the stencil, the kinetics, the integrator, and the sampler over
//! a single state with fixed rate constants. A run is a tight sequential
//! loop: prepare, sample step 0, then integrate and sample for the
//! configured number of steps. There is no failure path inside the loop —
//! every operation is pure arithmetic, total over the valid input domain —
//! so the only errors are configuration errors at construction.

use crate::config::{SimConfig, SEED_PEAK};
use crate::error::Result;
use crate::medium::integrator::{pulse, Integrator};
use crate::medium::kernel::Stencil;
use crate::medium::rates::RateConstants;
use crate::medium::sampler::{History, Sampler};
use crate::medium::state::MediumState;

/// A single excitable-medium run
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    constants: RateConstants,
    stencil: Stencil,
    state: MediumState,
    integrator: Integrator,
    sampler: Sampler,
}

impl Simulation {
    /// Build a simulation, validating the configuration once up front
    pub fn new(config: SimConfig, constants: RateConstants) -> Result<Self> {
        config.validate()?;
        let stencil = Stencil::new(&config.stencil)?;
        let state = MediumState::all_ready(config.cells);
        let integrator = Integrator::from_config(&config);
        let sampler = Sampler::new(config.sample_every, config.record_all_fields);
        Ok(Self {
            config,
            constants,
            stencil,
            state,
            integrator,
            sampler,
        })
    }

    /// Reset to the standard initial condition
    ///
    /// All cells fully ready, then one seed pulse of amplitude 0.5 at the
    /// lattice midpoint.
    pub fn prepare(&mut self) {
        self.state = MediumState::all_ready(self.config.cells);
        pulse(&mut self.state, self.config.cells / 2, SEED_PEAK);
        self.integrator = Integrator::from_config(&self.config);
        self.sampler = Sampler::new(self.config.sample_every, self.config.record_all_fields);
    }

    /// Run the configured number of steps and return the sampled history
    ///
    /// Always starts from `prepare()`; step 0 is sampled before any
    /// integration so the history opens with the seeded initial condition.
    pub fn run(&mut self) -> &History {
        self.prepare();
        let probe = self.config.probe_cell();
        self.sampler.on_step(&self.state, 0, 0.0);
        for _ in 0..self.config.num_steps {
            self.integrator
                .step(&mut self.state, &self.constants, &self.stencil, probe);
            self.sampler.on_step(
                &self.state,
                self.integrator.step_index(),
                self.integrator.elapsed(),
            );
        }
        self.sampler.history()
    }

    /// Sampled history so far
    pub fn history(&self) -> &History {
        self.sampler.history()
    }

    /// Current state of the medium
    pub fn state(&self) -> &MediumState {
        &self.state
    }

    /// Rate constants this run uses
    pub fn constants(&self) -> &RateConstants {
        &self.constants
    }

    /// Elapsed simulation time
    pub fn elapsed(&self) -> f64 {
        self.integrator.elapsed()
    }

    /// Probe cell index (configured, or the seed-pulse midpoint)
    pub fn probe(&self) -> usize {
        self.config.probe_cell()
    }

    /// Worst conservation drift observed during the run
    pub fn max_drift(&self) -> f64 {
        self.integrator.max_drift()
    }

    /// Consume the simulation, keeping only its history
    pub fn into_history(self) -> History {
        self.sampler.into_history()
    }
}
