//! Simulation configuration
//!
//! One immutable, validated structure covering the domain, the time axis,
//! the sampling cadence, and the optional periodic stimulus. Replaces the
//! loose per-call keyword arguments of earlier variants: everything is
//! checked once, up front, and never re-checked inside the step loop.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RingwaveError};

/// Canonical 3-point diffusion stencil (sums to 1)
pub const CANONICAL_STENCIL: [f64; 3] = [0.25, 0.5, 0.25];

/// Seed pulse amplitude applied at the lattice midpoint by `prepare()`
pub const SEED_PEAK: f64 = 0.5;

/// Periodic external stimulus settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StimulusConfig {
    /// Interval between pulses, in simulation time units
    pub period: f64,
    /// Peak active fraction the pulse drives the probe cell toward
    pub peak: f64,
}

/// Shared configuration for one simulation run
///
/// Defaults mirror the reference parameterization: a ring of length 10 at
/// spacing 0.1 (100 cells), dt = 0.1, duration 200 (2000 steps), with
/// roughly 40 sampled snapshots over the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of cells on the ring
    pub cells: usize,
    /// Physical ring length, when the domain was given as (length, spacing)
    pub length: Option<f64>,
    /// Integration time step
    pub dt: f64,
    /// Number of forward-Euler steps to run
    pub num_steps: usize,
    /// Sampling period in steps (snapshot every `sample_every` steps)
    pub sample_every: usize,
    /// Optional periodic stimulus at the probe cell
    pub stimulus: Option<StimulusConfig>,
    /// Spatial coupling weights for the active field
    pub stencil: Vec<f64>,
    /// Probe cell for scans and stimulus; `None` means the lattice midpoint
    pub probe: Option<usize>,
    /// Per-cell conservation drift that triggers the diagnostic warning
    pub drift_tolerance: f64,
    /// Record ready/resting in snapshots, not just active
    pub record_all_fields: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cells: 100,
            length: Some(10.0),
            dt: 0.1,
            num_steps: 2000,
            sample_every: 50,
            stimulus: None,
            stencil: CANONICAL_STENCIL.to_vec(),
            probe: None,
            drift_tolerance: 1e-6,
            record_all_fields: false,
        }
    }
}

impl SimConfig {
    /// Config with an explicit cell count
    pub fn with_cells(cells: usize) -> Self {
        Self {
            cells,
            length: None,
            ..Default::default()
        }
    }

    /// Config from a physical length and spacing: `cells = round(length / spacing)`
    pub fn from_length(length: f64, spacing: f64) -> Self {
        let cells = (length / spacing).round() as usize;
        Self {
            cells,
            length: Some(length),
            ..Default::default()
        }
    }

    /// Set the run length from a duration: `num_steps = round(duration / dt)`
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.num_steps = (duration / self.dt).round() as usize;
        self
    }

    /// Actual cell spacing after rounding, if the domain was given as a length
    pub fn spacing(&self) -> Option<f64> {
        self.length.map(|l| l / self.cells as f64)
    }

    /// Probe cell index: configured value, or the seed-pulse midpoint
    pub fn probe_cell(&self) -> usize {
        self.probe.unwrap_or(self.cells / 2)
    }

    /// Stimulus interval in whole steps, if a stimulus is configured
    pub fn stimulus_period_steps(&self) -> Option<u64> {
        self.stimulus
            .as_ref()
            .map(|s| (s.period / self.dt).round() as u64)
    }

    /// Validate every field; called once before a run ever starts
    pub fn validate(&self) -> Result<()> {
        if self.cells == 0 {
            return Err(RingwaveError::InvalidDomain(self.cells));
        }
        if !(self.dt > 0.0) {
            return Err(RingwaveError::InvalidTimeStep(self.dt));
        }
        if self.sample_every == 0 {
            return Err(RingwaveError::InvalidSamplePeriod);
        }
        if self.stencil.is_empty() {
            return Err(RingwaveError::EmptyStencil);
        }
        if self.stencil.iter().sum::<f64>() == 0.0 {
            return Err(RingwaveError::ZeroSumStencil);
        }
        if let Some(probe) = self.probe {
            if probe >= self.cells {
                return Err(RingwaveError::ProbeOutOfRange {
                    probe,
                    cells: self.cells,
                });
            }
        }
        if let Some(stim) = &self.stimulus {
            if !(stim.peak > 0.0 && stim.peak <= 1.0) {
                return Err(RingwaveError::InvalidStimulus(format!(
                    "peak must be in (0, 1], got {}",
                    stim.peak
                )));
            }
            if self.stimulus_period_steps().unwrap_or(0) == 0 {
                return Err(RingwaveError::InvalidStimulus(format!(
                    "period {} is shorter than one step (dt = {})",
                    stim.period, self.dt
                )));
            }
        }
        Ok(())
    }
}
