//! Snapshot sampling
//!
//! Records time-stamped copies of the state at a fixed step cadence. The
//! copies are deep: the live state is mutated on every subsequent step, and
//! each history entry must stay a frozen point in time.

use serde::{Deserialize, Serialize};

use crate::medium::state::MediumState;

/// One sampled point in time
///
/// `active` is always recorded; `ready` and `resting` only when the run is
/// configured to record all fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Elapsed simulation time at the sample
    pub time: f64,
    /// Active fraction per cell
    pub active: Vec<f64>,
    /// Ready fraction per cell, if recorded
    pub ready: Option<Vec<f64>>,
    /// Resting fraction per cell, if recorded
    pub resting: Option<Vec<f64>>,
}

/// Ordered, append-only sequence of snapshots
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    snapshots: Vec<Snapshot>,
}

impl History {
    /// Number of samples taken
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when nothing has been sampled yet
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Iterate over snapshots in sampling order
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    /// Snapshot at sample index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Sample times in order
    pub fn times(&self) -> Vec<f64> {
        self.snapshots.iter().map(|s| s.time).collect()
    }

    /// Active fraction of one cell across all samples (a probe time series)
    pub fn series_at(&self, cell: usize) -> Vec<f64> {
        self.snapshots.iter().map(|s| s.active[cell]).collect()
    }

    /// Active field of every sample, rows in time order
    pub fn active_matrix(&self) -> Vec<Vec<f64>> {
        self.snapshots.iter().map(|s| s.active.clone()).collect()
    }

    fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }
}

/// Fixed-cadence state recorder
#[derive(Clone, Debug)]
pub struct Sampler {
    every: u64,
    record_all: bool,
    history: History,
}

impl Sampler {
    /// Sampler recording every `every` steps (must be validated ≥ 1 upstream)
    pub fn new(every: usize, record_all: bool) -> Self {
        Self {
            every: every.max(1) as u64,
            record_all,
            history: History::default(),
        }
    }

    /// Record a snapshot when `step_index` falls on the cadence
    pub fn on_step(&mut self, state: &MediumState, step_index: u64, elapsed: f64) {
        if step_index % self.every != 0 {
            return;
        }
        self.history.push(Snapshot {
            time: elapsed,
            active: state.active.clone(),
            ready: self.record_all.then(|| state.ready.clone()),
            resting: self.record_all.then(|| state.resting.clone()),
        });
    }

    /// Samples taken so far
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Consume the sampler, keeping its history
    pub fn into_history(self) -> History {
        self.history
    }
}
