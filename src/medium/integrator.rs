//! Explicit forward-Euler time integration
//!
//! Advances the state in place: one derivative evaluation and exactly one
//! multiplication by dt per step. An earlier variant of this model applied
//! dt twice (scaling the update by dt²), which broke both conservation and
//! the propagation speed; that behavior is deliberately not reproduced.
//!
//! The integrator performs no bounds clamping: under a large dt the fields
//! may drift outside [0, 1]. Drift is reported through the conservation
//! diagnostic, never corrected.

use crate::config::SimConfig;
use crate::medium::kernel::Stencil;
use crate::medium::rates::{derivative, RateConstants};
use crate::medium::state::MediumState;

/// Periodic stimulus schedule, resolved to whole steps
#[derive(Clone, Copy, Debug)]
struct StimulusClock {
    /// Pulse on every step whose index is a multiple of this
    every_steps: u64,
    /// Pulse amplitude
    peak: f64,
}

/// Forward-Euler stepper with optional periodic stimulus
#[derive(Clone, Debug)]
pub struct Integrator {
    dt: f64,
    step_index: u64,
    elapsed: f64,
    stimulus: Option<StimulusClock>,
    drift_tolerance: f64,
    max_drift: f64,
    drift_reported: bool,
}

impl Integrator {
    /// Build an integrator from a validated configuration
    pub fn from_config(config: &SimConfig) -> Self {
        let stimulus = config.stimulus.as_ref().map(|s| StimulusClock {
            every_steps: config.stimulus_period_steps().unwrap_or(1).max(1),
            peak: s.peak,
        });
        Self {
            dt: config.dt,
            step_index: 0,
            elapsed: 0.0,
            stimulus,
            drift_tolerance: config.drift_tolerance,
            max_drift: 0.0,
            drift_reported: false,
        }
    }

    /// Steps taken so far
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// Elapsed simulation time
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Worst per-cell conservation deviation observed after any step
    pub fn max_drift(&self) -> f64 {
        self.max_drift
    }

    /// Advance the state by one step
    ///
    /// When a stimulus is scheduled for this step it is applied at the probe
    /// cell before the derivative is computed, exactly once.
    pub fn step(
        &mut self,
        state: &mut MediumState,
        constants: &RateConstants,
        stencil: &Stencil,
        probe: usize,
    ) {
        if let Some(clock) = self.stimulus {
            if self.step_index % clock.every_steps == 0 {
                pulse(state, probe, clock.peak);
            }
        }

        let delta = derivative(state, constants, stencil);
        for i in 0..state.len() {
            state.active[i] += self.dt * delta.d_active[i];
            state.resting[i] += self.dt * delta.d_resting[i];
            state.ready[i] += self.dt * delta.d_ready[i];
        }

        self.step_index += 1;
        self.elapsed += self.dt;
        self.observe_drift(state);
    }

    fn observe_drift(&mut self, state: &MediumState) {
        let drift = state.max_sum_deviation();
        if drift > self.max_drift {
            self.max_drift = drift;
        }
        if drift > self.drift_tolerance && !self.drift_reported {
            self.drift_reported = true;
            log::warn!(
                "conservation drift {:.3e} exceeds tolerance {:.3e} at step {} (t = {:.4})",
                drift,
                self.drift_tolerance,
                self.step_index,
                self.elapsed
            );
        }
    }
}

/// Force-excite one cell toward `peak`
///
/// Recruits ready capacity into the active fraction: the refractory
/// (resting) fraction cannot be re-excited, so the pulse caps at
/// `active + ready` even when that is below `peak`. Ready is then
/// recomputed as the remainder, which keeps the per-cell sum exact. A cell
/// already at or above `peak` is left untouched, so repeated pulses never
/// drive the active fraction past `peak`.
pub fn pulse(state: &mut MediumState, cell: usize, peak: f64) {
    if state.active[cell] >= peak {
        return;
    }
    let recruitable = state.active[cell] + state.ready[cell];
    state.active[cell] = peak.min(recruitable);
    state.ready[cell] = 1.0 - state.resting[cell] - state.active[cell];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StimulusConfig;

    fn unit_constants() -> RateConstants {
        RateConstants::new(1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_single_euler_step() {
        // Concrete scenario: N=4 spike, unit constants, dt=0.1. The update
        // must scale the derivative by dt exactly once.
        let mut state = MediumState::new(
            vec![1.0, 0.0, 1.0, 1.0],
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0],
        )
        .unwrap();
        let mut config = SimConfig::with_cells(4);
        config.dt = 0.1;
        let mut integrator = Integrator::from_config(&config);

        integrator.step(&mut state, &unit_constants(), &Stencil::canonical(), 2);

        let expect_active = [0.025, 0.9, 0.025, 0.0];
        let expect_resting = [0.0, 0.1, 0.0, 0.0];
        let expect_ready = [0.975, 0.0, 0.975, 1.0];
        for i in 0..4 {
            assert!(
                (state.active[i] - expect_active[i]).abs() < 1e-12,
                "active[{i}]: expected {}, got {}",
                expect_active[i],
                state.active[i]
            );
            assert!((state.resting[i] - expect_resting[i]).abs() < 1e-12);
            assert!((state.ready[i] - expect_ready[i]).abs() < 1e-12);
            let sum = state.active[i] + state.resting[i] + state.ready[i];
            assert!(
                (sum - 1.0).abs() < 1e-12,
                "cell {i} sum {sum} broke conservation"
            );
        }
        assert!((integrator.elapsed() - 0.1).abs() < 1e-12);
        assert_eq!(integrator.step_index(), 1);
    }

    #[test]
    fn test_conservation_over_many_steps() {
        let mut state = MediumState::all_ready(20);
        pulse(&mut state, 10, 0.5);
        let config = SimConfig::with_cells(20);
        let mut integrator = Integrator::from_config(&config);
        let constants = RateConstants::default();
        let stencil = Stencil::canonical();

        for _ in 0..500 {
            integrator.step(&mut state, &constants, &stencil, 10);
        }
        // Forward Euler preserves the sum to first order; the cyclic terms
        // cancel exactly in the update, so only rounding accumulates.
        assert!(
            state.max_sum_deviation() < 1e-9,
            "drift {} after 500 steps",
            state.max_sum_deviation()
        );
    }

    #[test]
    fn test_seed_pulse_on_all_ready_lattice() {
        let mut state = MediumState::all_ready(9);
        pulse(&mut state, 4, 0.5);
        assert!((state.active[4] - 0.5).abs() < 1e-12);
        assert!((state.ready[4] - 0.5).abs() < 1e-12);
        assert_eq!(state.resting[4], 0.0);
        // Other cells untouched
        assert_eq!(state.active[0], 0.0);
        assert_eq!(state.ready[0], 1.0);
    }

    #[test]
    fn test_pulse_idempotence_bound() {
        let mut state = MediumState::all_ready(5);
        for _ in 0..10 {
            pulse(&mut state, 2, 0.5);
            assert!(
                state.active[2] <= 0.5 + 1e-12,
                "pulse drove active past peak: {}",
                state.active[2]
            );
        }
        assert!((state.active[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_pulse_does_not_recruit_refractory_mass() {
        let mut state =
            MediumState::new(vec![0.2], vec![0.1], vec![0.7]).unwrap();
        pulse(&mut state, 0, 0.5);
        // Only active + ready = 0.3 is recruitable; resting stays put
        assert!((state.active[0] - 0.3).abs() < 1e-12);
        assert!((state.resting[0] - 0.7).abs() < 1e-12);
        assert!(state.ready[0].abs() < 1e-12);
        assert!(state.max_sum_deviation() < 1e-12);
    }

    #[test]
    fn test_periodic_stimulus_fires_on_schedule() {
        let mut config = SimConfig::with_cells(11);
        config.dt = 0.1;
        config.stimulus = Some(StimulusConfig {
            period: 0.5,
            peak: 0.8,
        });
        // Deactivation only: without re-stimulation the spike decays
        let constants = RateConstants::new(0.0, 1.0, 0.0).unwrap();
        let stencil = Stencil::canonical();
        let mut state = MediumState::all_ready(11);
        let mut integrator = Integrator::from_config(&config);

        // Step 0 qualifies (0 % 5 == 0): the pulse fires before integration
        integrator.step(&mut state, &constants, &stencil, 5);
        assert!(
            state.active[5] > 0.7,
            "stimulus should have excited the probe cell"
        );

        // Steps 1..=4 decay; step 5 re-pulses
        let after_first = state.active[5];
        for _ in 0..4 {
            integrator.step(&mut state, &constants, &stencil, 5);
        }
        let before_repulse = state.active[5];
        assert!(before_repulse < after_first);
        integrator.step(&mut state, &constants, &stencil, 5);
        // Probe was re-excited toward peak before this step's decay
        assert!(state.active[5] > before_repulse);
    }

    #[test]
    fn test_no_clamping_outside_unit_interval() {
        // A huge dt overshoots; the integrator must not clamp
        let mut state = MediumState::new(
            vec![0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0],
        )
        .unwrap();
        let mut config = SimConfig::with_cells(3);
        config.dt = 10.0;
        let mut integrator = Integrator::from_config(&config);
        integrator.step(&mut state, &unit_constants(), &Stencil::canonical(), 1);
        assert!(
            state.active[1] < 0.0,
            "overshoot should go negative, got {}",
            state.active[1]
        );
    }

    #[test]
    fn test_drift_diagnostic_tracks_maximum() {
        let mut state =
            MediumState::new(vec![0.0], vec![2.0], vec![0.0]).unwrap();
        let mut config = SimConfig::with_cells(1);
        config.dt = 1.0;
        let mut integrator = Integrator::from_config(&config);
        integrator.step(&mut state, &unit_constants(), &Stencil::canonical(), 0);
        assert!(integrator.max_drift() > 0.0);
    }
}
