use log::trace;
use ode_solvers::dop_shared::{IntegrationError, OutputType};
use ode_solvers::{Dopri5, Vector5};
use serde::{Deserialize, Serialize};

use crate::dynamics::state::StateVector;
use crate::errors::SimError;

// ---------------------------------------------------------------------------
// ODE system interface
// ---------------------------------------------------------------------------

/// First-order system `dy/dt = f(t, y)` over the ascent state vector.
pub trait OdeSystem {
    fn rhs(&self, t: f64, y: &StateVector) -> StateVector;
}

/// Vector type the solver crate steps.
type SolverState = Vector5<f64>;

// ---------------------------------------------------------------------------
// Solver options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorOptions {
    pub rtol: f64,
    pub atol: f64,
    pub max_step: f64,
    /// Step budget for each solver run between two output times.
    pub max_steps: usize,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-3,
            atol: 1e-6,
            max_step: 10.0,
            max_steps: 100_000,
        }
    }
}

// Dopri5 step-size controller, at the values Hairer's DOPRI5 ships with.
const SAFETY: f64 = 0.9;
const BETA: f64 = 0.04;
const FAC_MIN: f64 = 0.2;
const FAC_MAX: f64 = 10.0;
const STIFFNESS_CHECK: u32 = 1000;

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Adaptive Dormand-Prince 5(4) (`ode_solvers::Dopri5`) sampled on a
/// caller-chosen time grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct DormandPrince {
    pub options: IntegratorOptions,
}

impl DormandPrince {
    pub fn new(options: IntegratorOptions) -> Self {
        Self { options }
    }

    /// Solve from `t_eval[0]` (where the state is `y0`) and return the state at
    /// every entry of `t_eval`, which must be non-decreasing.
    ///
    /// `breakpoints` are times where the right-hand side is discontinuous. The
    /// solver is restarted on each of them from the right-hand limit.
    pub fn solve<S: OdeSystem>(
        &self,
        system: &S,
        y0: StateVector,
        t_eval: &[f64],
        breakpoints: &[f64],
    ) -> Result<Vec<StateVector>, SimError> {
        let Some(&t0) = t_eval.first() else {
            return Ok(Vec::new());
        };
        if t_eval.windows(2).any(|w| !(w[1] >= w[0])) {
            return Err(SimError::InvalidConfig(
                "evaluation times must be non-decreasing".into(),
            ));
        }
        if !is_finite(&y0) {
            return Err(SimError::IntegrationFailure {
                time: t0,
                reason: "non-finite initial state".into(),
            });
        }
        if !is_finite(&system.rhs(t0, &y0)) {
            return Err(SimError::IntegrationFailure {
                time: t0,
                reason: "non-finite derivative".into(),
            });
        }

        let mut cuts = breakpoints.to_vec();
        cuts.sort_by(f64::total_cmp);

        let mut out = Vec::with_capacity(t_eval.len());
        out.push(y0);
        let mut y = y0;
        for w in t_eval.windows(2) {
            let (from, to) = (w[0], w[1]);
            let mut t = from;
            let inner = cuts.iter().copied().filter(|&b| b > from && b < to);
            for stop in inner.chain(std::iter::once(to)) {
                if stop > t {
                    y = self.run(system, t, stop, y, &cuts)?;
                    t = stop;
                }
            }
            out.push(y);
        }
        Ok(out)
    }

    /// One solver run over `[from, to]`, no breakpoint inside.
    fn run<S: OdeSystem>(
        &self,
        system: &S,
        from: f64,
        to: f64,
        y: StateVector,
        cuts: &[f64],
    ) -> Result<StateVector, SimError> {
        let opts = &self.options;
        let floor = if cuts.contains(&from) { just_after(from) } else { f64::NEG_INFINITY };
        let mut stepper = Dopri5::from_param(
            Segment { system, floor },
            from,
            to,
            0.0,
            SolverState::from_column_slice(y.as_slice()),
            opts.rtol,
            opts.atol,
            SAFETY,
            BETA,
            FAC_MIN,
            FAC_MAX,
            opts.max_step,
            0.0,
            u32::try_from(opts.max_steps).unwrap_or(u32::MAX),
            STIFFNESS_CHECK,
            OutputType::Sparse,
        );
        let stats = stepper.integrate().map_err(failure)?;
        trace!(
            "[{:.3}, {:.3}] s: {} accepted, {} rejected steps",
            from,
            to,
            stats.accepted_steps,
            stats.rejected_steps
        );

        for (x, v) in stepper.x_out().iter().zip(stepper.y_out().iter()) {
            if !v.iter().all(|c| c.is_finite()) {
                return Err(SimError::IntegrationFailure {
                    time: *x,
                    reason: "state became non-finite".into(),
                });
            }
        }
        let last = stepper.y_out().last().ok_or_else(|| SimError::IntegrationFailure {
            time: from,
            reason: "solver produced no output".into(),
        })?;
        Ok(StateVector::from_column_slice(last.as_slice()))
    }
}

/// The system as the solver crate sees it. Times at or before `floor` are
/// evaluated just after it, so a run starting on a breakpoint sees the
/// right-hand limit.
struct Segment<'a, S> {
    system: &'a S,
    floor: f64,
}

impl<S: OdeSystem> ode_solvers::System<SolverState> for Segment<'_, S> {
    fn system(&self, t: f64, y: &SolverState, dy: &mut SolverState) {
        let state = StateVector::from_column_slice(y.as_slice());
        let d = self.system.rhs(t.max(self.floor), &state);
        dy.copy_from_slice(d.as_slice());
    }
}

fn failure(err: IntegrationError) -> SimError {
    let (time, reason) = match err {
        IntegrationError::MaxNumStepReached { x, n_step } => (x, format!("exceeded {} steps", n_step)),
        IntegrationError::StepSizeUnderflow { x } => (x, "step size underflow".to_string()),
        IntegrationError::StiffnessDetected { x } => (x, "problem became stiff".to_string()),
    };
    SimError::IntegrationFailure { time, reason }
}

fn is_finite(v: &StateVector) -> bool {
    v.iter().all(|x| x.is_finite())
}

fn just_after(t: f64) -> f64 {
    t + t.abs().max(1.0) * f64::EPSILON
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn only(x: f64) -> StateVector {
        StateVector::new(x, 0.0, 0.0, 0.0, 0.0)
    }

    struct Decay;

    impl OdeSystem for Decay {
        fn rhs(&self, _t: f64, y: &StateVector) -> StateVector {
            -*y
        }
    }

    struct Oscillator;

    impl OdeSystem for Oscillator {
        fn rhs(&self, _t: f64, y: &StateVector) -> StateVector {
            StateVector::new(y[1], -y[0], 0.0, 0.0, 0.0)
        }
    }

    /// dy/dt = y^2, y(0) = 1 blows up at t = 1.
    struct BlowUp;

    impl OdeSystem for BlowUp {
        fn rhs(&self, _t: f64, y: &StateVector) -> StateVector {
            only(y[0] * y[0])
        }
    }

    /// Unit slope that switches off after t = 1.
    struct Step;

    impl OdeSystem for Step {
        fn rhs(&self, t: f64, _y: &StateVector) -> StateVector {
            only(if t <= 1.0 { 1.0 } else { 0.0 })
        }
    }

    fn tight() -> DormandPrince {
        DormandPrince::new(IntegratorOptions {
            rtol: 1e-9,
            atol: 1e-12,
            ..IntegratorOptions::default()
        })
    }

    #[test]
    fn exponential_decay_matches_closed_form() {
        let grid: Vec<f64> = (0..=50).map(|i| i as f64 * 0.1).collect();
        let ys = tight().solve(&Decay, StateVector::repeat(1.0), &grid, &[]).unwrap();
        assert_eq!(ys.len(), grid.len());
        for (t, y) in grid.iter().zip(&ys) {
            for c in y.iter() {
                assert!((c - (-t).exp()).abs() < 1e-8, "t={} y={}", t, c);
            }
        }
    }

    #[test]
    fn oscillator_conserves_energy() {
        let grid: Vec<f64> = (0..=100).map(|i| i as f64 * 0.2).collect();
        let ys = tight()
            .solve(&Oscillator, only(1.0), &grid, &[])
            .unwrap();
        let last = ys.last().unwrap();
        let energy = last[0] * last[0] + last[1] * last[1];
        assert!((energy - 1.0).abs() < 1e-6);
        assert!((last[0] - 20.0_f64.cos()).abs() < 1e-6);
    }

    #[test]
    fn breakpoint_keeps_discontinuity_sharp() {
        let grid = [0.0, 0.5, 1.5, 2.0];
        let ys = DormandPrince::default()
            .solve(&Step, only(0.0), &grid, &[1.0])
            .unwrap();
        assert!((ys[1][0] - 0.5).abs() < 1e-12);
        assert!((ys[2][0] - 1.0).abs() < 1e-12);
        assert!((ys[3][0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_point_grid_returns_initial_state() {
        let ys = DormandPrince::default()
            .solve(&Decay, only(3.0), &[0.0], &[])
            .unwrap();
        assert_eq!(ys, vec![only(3.0)]);
    }

    #[test]
    fn repeated_grid_times_repeat_the_state() {
        let ys = DormandPrince::default()
            .solve(&Decay, only(1.0), &[0.0, 1.0, 1.0], &[])
            .unwrap();
        assert_eq!(ys[1], ys[2]);
    }

    #[test]
    fn blow_up_reports_failure() {
        let err = DormandPrince::default()
            .solve(&BlowUp, only(1.0), &[0.0, 0.5, 1.0, 1.5, 2.0], &[])
            .unwrap_err();
        match err {
            SimError::IntegrationFailure { time, .. } => {
                assert!(time > 0.5 && time <= 1.5, "failed at t={}", time)
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn step_budget_exhaustion_is_a_failure() {
        let solver = DormandPrince::new(IntegratorOptions {
            max_step: 0.01,
            max_steps: 5,
            ..IntegratorOptions::default()
        });
        let err = solver.solve(&Oscillator, only(1.0), &[0.0, 100.0], &[]).unwrap_err();
        assert!(matches!(err, SimError::IntegrationFailure { .. }));
    }

    #[test]
    fn decreasing_grid_rejected() {
        let err = DormandPrince::default()
            .solve(&Decay, only(1.0), &[0.0, 1.0, 0.5], &[])
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn runs_are_bit_identical() {
        let grid: Vec<f64> = (0..=30).map(|i| i as f64 * 0.3).collect();
        let solver = DormandPrince::default();
        let a = solver.solve(&Oscillator, StateVector::new(0.3, 1.0, 0.0, 0.0, 0.0), &grid, &[]).unwrap();
        let b = solver.solve(&Oscillator, StateVector::new(0.3, 1.0, 0.0, 0.0, 0.0), &grid, &[]).unwrap();
        assert_eq!(a, b);
    }
}
