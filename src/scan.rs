//! Rate-constant parameter sweeps
//!
//! Runs one independent simulation for every combination in the Cartesian
//! product of three rate-constant grids, collecting the probe cell's
//! sampled active series per combination. The product is a finite,
//! restartable, order-stable generator; the sweep is embarrassingly
//! parallel, so the parallel path hands each combination to a rayon worker
//! that owns its entire simulation and synchronizes only on result
//! collection. No randomness anywhere: sequential and parallel sweeps
//! produce bit-identical records.
//!
//! A combination rejected by validation fails its own record and never
//! aborts the rest of the sweep.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::{Result, RingwaveError};
use crate::medium::{RateConstants, Simulation};

/// Candidate values for each rate constant
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub k_activation: Vec<f64>,
    pub k_deactivation: Vec<f64>,
    pub k_recovery: Vec<f64>,
}

impl ParamGrid {
    /// Geometrically (log-) spaced values from `lo` to `hi` inclusive
    pub fn log_spaced(lo: f64, hi: f64, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![lo],
            _ => {
                let ratio = (hi / lo).powf(1.0 / (count - 1) as f64);
                (0..count).map(|i| lo * ratio.powi(i as i32)).collect()
            }
        }
    }

    /// Total number of combinations
    pub fn len(&self) -> usize {
        self.k_activation.len() * self.k_deactivation.len() * self.k_recovery.len()
    }

    /// True when any axis is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All `(k_activation, k_deactivation, k_recovery)` triples
    ///
    /// Fixed deterministic order: k_activation outermost, then
    /// k_deactivation, then k_recovery. Restartable — each call starts a
    /// fresh pass over the same grid.
    pub fn combinations(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.k_activation.iter().flat_map(move |&ka| {
            self.k_deactivation.iter().flat_map(move |&kd| {
                self.k_recovery.iter().map(move |&kr| (ka, kd, kr))
            })
        })
    }
}

/// Sampled probe series for one rate-constant combination
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// The constants this run used
    pub constants: RateConstants,
    /// Lattice index the series was sampled at
    pub probe: usize,
    /// Active fraction at the probe, one value per snapshot
    pub active_series: Vec<f64>,
    /// Snapshot times matching `active_series`
    pub time_series: Vec<f64>,
}

/// One sweep slot: the requested triple plus its result or failure
///
/// Consumers must key records by `constants`, not position — a parallel
/// sweep guarantees content, not completion order (this implementation
/// happens to preserve sweep order either way).
#[derive(Clone, Debug, PartialEq)]
pub struct ScanRecord {
    /// Requested `(k_activation, k_deactivation, k_recovery)`
    pub constants: (f64, f64, f64),
    /// The sampled series, or why this combination failed validation
    pub outcome: std::result::Result<ScanResult, RingwaveError>,
}

/// Sweep of independent simulations over a rate-constant grid
#[derive(Clone, Debug)]
pub struct Scan {
    config: SimConfig,
    grid: ParamGrid,
}

impl Scan {
    /// Build a sweep; the shared domain configuration is validated once here
    pub fn new(config: SimConfig, grid: ParamGrid) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, grid })
    }

    /// The shared per-run configuration
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run every combination sequentially, in sweep order
    pub fn run(&self) -> Vec<ScanRecord> {
        let never = AtomicBool::new(false);
        self.run_with_cancel(&never)
    }

    /// Sequential sweep with cooperative cancellation
    ///
    /// The flag is checked between whole runs, never mid-step; a cancelled
    /// sweep returns the records completed so far.
    pub fn run_with_cancel(&self, cancel: &AtomicBool) -> Vec<ScanRecord> {
        let mut records = Vec::with_capacity(self.grid.len());
        for triple in self.grid.combinations() {
            if cancel.load(Ordering::Relaxed) {
                log::debug!("scan cancelled after {} of {} runs", records.len(), self.grid.len());
                break;
            }
            records.push(self.run_one(triple));
        }
        records
    }

    /// Run every combination across a rayon worker pool
    ///
    /// Each worker owns its simulation and history; only the ordered
    /// collect synchronizes. Records come back in sweep order and are
    /// bit-identical to a sequential sweep.
    pub fn run_parallel(&self) -> Vec<ScanRecord> {
        let never = AtomicBool::new(false);
        self.run_parallel_with_cancel(&never)
    }

    /// Parallel sweep with cooperative cancellation
    ///
    /// Combinations whose run had not started when the flag was raised are
    /// skipped; already-running simulations complete normally.
    pub fn run_parallel_with_cancel(&self, cancel: &AtomicBool) -> Vec<ScanRecord> {
        let combos: Vec<(f64, f64, f64)> = self.grid.combinations().collect();
        combos
            .into_par_iter()
            .filter_map(|triple| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                Some(self.run_one(triple))
            })
            .collect()
    }

    fn run_one(&self, triple: (f64, f64, f64)) -> ScanRecord {
        log::debug!(
            "running k_activation={} k_deactivation={} k_recovery={}",
            triple.0,
            triple.1,
            triple.2
        );
        ScanRecord {
            constants: triple,
            outcome: self.simulate(triple),
        }
    }

    fn simulate(&self, (ka, kd, kr): (f64, f64, f64)) -> Result<ScanResult> {
        let constants = RateConstants::new(ka, kd, kr)?;
        let mut sim = Simulation::new(self.config.clone(), constants)?;
        sim.run();
        let probe = sim.probe();
        let history = sim.into_history();
        Ok(ScanResult {
            constants,
            probe,
            active_series: history.series_at(probe),
            time_series: history.times(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_config() -> SimConfig {
        let mut config = SimConfig::with_cells(9);
        config.dt = 0.1;
        config.num_steps = 20;
        config.sample_every = 5;
        config
    }

    fn tiny_grid() -> ParamGrid {
        ParamGrid {
            k_activation: vec![1.0, 10.0],
            k_deactivation: vec![0.5, 3.0],
            k_recovery: vec![0.1],
        }
    }

    #[test]
    fn test_log_spaced() {
        let values = ParamGrid::log_spaced(0.1, 10.0, 3);
        assert_eq!(values.len(), 3);
        assert!((values[0] - 0.1).abs() < 1e-12);
        assert!((values[1] - 1.0).abs() < 1e-9);
        assert!((values[2] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_cartesian_order_and_restartability() {
        let grid = tiny_grid();
        assert_eq!(grid.len(), 4);
        let first: Vec<_> = grid.combinations().collect();
        assert_eq!(
            first,
            vec![
                (1.0, 0.5, 0.1),
                (1.0, 3.0, 0.1),
                (10.0, 0.5, 0.1),
                (10.0, 3.0, 0.1),
            ]
        );
        // A second pass yields the same sequence
        let second: Vec<_> = grid.combinations().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sweep_produces_one_record_per_combination() {
        let scan = Scan::new(tiny_config(), tiny_grid()).unwrap();
        let records = scan.run();
        assert_eq!(records.len(), 4);
        for record in &records {
            let result = record.outcome.as_ref().expect("all combinations valid");
            assert_eq!(result.probe, 4);
            // Step 0 plus steps 5, 10, 15, 20
            assert_eq!(result.active_series.len(), 5);
            assert_eq!(result.time_series.len(), 5);
            // Every series opens at the seeded probe value
            assert!((result.active_series[0] - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_parallel_matches_sequential_bit_for_bit() {
        let scan = Scan::new(tiny_config(), tiny_grid()).unwrap();
        let sequential = scan.run();
        let parallel = scan.run_parallel();
        assert_eq!(sequential, parallel);
        // And a repeat sweep reproduces the same records
        assert_eq!(sequential, scan.run());
    }

    #[test]
    fn test_invalid_combination_fails_only_its_slot() {
        let grid = ParamGrid {
            k_activation: vec![1.0, -1.0],
            k_deactivation: vec![1.0],
            k_recovery: vec![0.1],
        };
        let scan = Scan::new(tiny_config(), grid).unwrap();
        let records = scan.run();
        assert_eq!(records.len(), 2);
        assert!(records[0].outcome.is_ok());
        assert!(matches!(
            records[1].outcome,
            Err(RingwaveError::NegativeRateConstant { .. })
        ));
        assert_eq!(records[1].constants, (-1.0, 1.0, 0.1));
    }

    #[test]
    fn test_runs_are_independent() {
        // The slot for a triple inside a sweep equals a standalone run of
        // the same triple: no state leaks between combinations.
        let scan = Scan::new(tiny_config(), tiny_grid()).unwrap();
        let records = scan.run_parallel();
        let standalone = {
            let constants = RateConstants::new(10.0, 3.0, 0.1).unwrap();
            let mut sim = Simulation::new(tiny_config(), constants).unwrap();
            sim.run();
            let probe = sim.probe();
            sim.into_history().series_at(probe)
        };
        let slot = records
            .iter()
            .find(|r| r.constants == (10.0, 3.0, 0.1))
            .unwrap();
        assert_eq!(
            slot.outcome.as_ref().unwrap().active_series,
            standalone
        );
    }

    #[test]
    fn test_cancelled_sweep_returns_completed_prefix() {
        let scan = Scan::new(tiny_config(), tiny_grid()).unwrap();
        let cancel = AtomicBool::new(true);
        assert!(scan.run_with_cancel(&cancel).is_empty());
        assert!(scan.run_parallel_with_cancel(&cancel).is_empty());
    }

    #[test]
    fn test_bad_shared_config_fails_at_construction() {
        let mut config = tiny_config();
        config.cells = 0;
        assert!(Scan::new(config, tiny_grid()).is_err());
    }
}
