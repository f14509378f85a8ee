use log::{debug, info};

use crate::dynamics::point_mass::AscentDynamics;
use crate::dynamics::state::State;
use crate::errors::SimError;
use crate::vehicle::MissionConfig;

use super::integrator::DormandPrince;

// ---------------------------------------------------------------------------
// Output grid
// ---------------------------------------------------------------------------

/// Evenly spaced times `0, dt, 2dt, ...` up to and including `horizon` when it
/// falls on the grid. A zero horizon gives `[0.0]`.
pub fn time_grid(horizon: f64, dt: f64) -> Vec<f64> {
    if !(horizon > 0.0) || !(dt > 0.0) {
        return vec![0.0];
    }
    let n = (horizon / dt + 1e-9).floor() as usize;
    (0..=n).map(|i| i as f64 * dt).collect()
}

// ---------------------------------------------------------------------------
// Trajectory simulation
// ---------------------------------------------------------------------------

/// Integrate the ascent over the configured horizon and output grid.
pub fn simulate(config: &MissionConfig) -> Result<Vec<State>, SimError> {
    let horizon = config.sim.horizon_for(&config.vehicle);
    simulate_on(config, &time_grid(horizon, config.sim.dt))
}

/// Integrate the ascent from ignition and return the state at each `grid` time.
///
/// The grid must be non-decreasing and non-negative. Pure: equal inputs give
/// bit-identical output.
pub fn simulate_on(config: &MissionConfig, grid: &[f64]) -> Result<Vec<State>, SimError> {
    config
        .validate()
        .map_err(|e| SimError::InvalidConfig(e.to_string()))?;
    let Some(&first) = grid.first() else {
        return Ok(Vec::new());
    };
    if first < 0.0 {
        return Err(SimError::InvalidConfig(format!(
            "output grid starts before ignition (t={})",
            first
        )));
    }

    // The initial state is defined at ignition; prepend it when the grid starts later.
    let mut t_eval = Vec::with_capacity(grid.len() + 1);
    let skip = usize::from(first > 0.0);
    if skip == 1 {
        t_eval.push(0.0);
    }
    t_eval.extend_from_slice(grid);

    let initial = State::initial(&config.vehicle);
    let system = AscentDynamics { config };
    let solver = DormandPrince::new(config.sim.integrator);
    let breakpoints = [config.vehicle.burn_time];

    info!(
        "simulating '{}': {} output points to t={:.2} s",
        config.name,
        grid.len(),
        grid[grid.len() - 1]
    );
    let ys = solver.solve(&system, initial.to_vector(), &t_eval, &breakpoints)?;

    let dry = config.vehicle.dry_mass();
    let trajectory: Vec<State> = t_eval
        .iter()
        .zip(&ys)
        .skip(skip)
        .map(|(&t, y)| {
            let mut s = State::from_vector(t, y);
            s.mass = s.mass.max(dry);
            s
        })
        .collect();

    if let Some(last) = trajectory.last() {
        debug!(
            "final state t={:.2} s alt={:.0} m downrange={:.0} m speed={:.1} m/s mass={:.0} kg",
            last.time,
            last.altitude(),
            last.downrange(),
            last.speed(),
            last.mass
        );
    }
    Ok(trajectory)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{presets, VehicleParams};

    fn coarse() -> MissionConfig {
        let mut cfg = presets::artemis_kerbin();
        cfg.sim.dt = 0.5;
        cfg
    }

    #[test]
    fn grid_includes_horizon_on_step() {
        let g = time_grid(1.0, 0.25);
        assert_eq!(g, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(time_grid(0.0, 0.01), vec![0.0]);
        assert_eq!(time_grid(135.0, 0.01).len(), 13_501);
    }

    #[test]
    fn zero_horizon_returns_initial_state() {
        let mut cfg = coarse();
        cfg.sim.horizon = Some(0.0);
        let traj = simulate(&cfg).unwrap();
        assert_eq!(traj.len(), 1);
        assert_eq!(traj[0], State::initial(&cfg.vehicle));
    }

    #[test]
    fn rocket_climbs_and_pitches_downrange() {
        let traj = simulate(&coarse()).unwrap();
        let burnout = traj.last().unwrap();
        assert!(burnout.altitude() > 20_000.0, "alt {}", burnout.altitude());
        assert!(burnout.downrange() > 47_000.0, "downrange {}", burnout.downrange());
        assert!(burnout.speed() > 1_500.0);
    }

    #[test]
    fn mass_monotone_and_bounded_by_dry() {
        let mut cfg = coarse();
        cfg.sim.horizon = Some(200.0);
        let dry = cfg.vehicle.dry_mass();
        let traj = simulate(&cfg).unwrap();
        for w in traj.windows(2) {
            assert!(w[1].mass <= w[0].mass, "mass rose at t={}", w[1].time);
        }
        for s in &traj {
            assert!(s.mass >= dry);
        }
        let last = traj.last().unwrap();
        // The step ending on burnout sees zero flow at its last stages.
        assert!((last.mass - dry) / dry < 2e-2, "mass {} dry {}", last.mass, dry);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let cfg = coarse();
        assert_eq!(simulate(&cfg).unwrap(), simulate(&cfg).unwrap());
    }

    #[test]
    fn grid_starting_after_ignition() {
        let cfg = coarse();
        let traj = simulate_on(&cfg, &[10.0, 20.0]).unwrap();
        assert_eq!(traj.len(), 2);
        assert_eq!(traj[0].time, 10.0);
        assert!(traj[0].altitude() > cfg.vehicle.launch_altitude);
        assert!(simulate_on(&cfg, &[-1.0, 0.0]).is_err());
    }

    #[test]
    fn invalid_config_rejected_before_solving() {
        let mut cfg = coarse();
        cfg.vehicle = VehicleParams { propellant_mass: 1.0e9, ..VehicleParams::default() };
        assert!(matches!(simulate(&cfg), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn underpowered_vehicle_falls_through_the_pad_without_failure() {
        // Sub-unity TWR: the point-mass model has no ground, so it just sinks.
        let mut cfg = coarse();
        cfg.vehicle.initial_thrust = 1.0e6;
        cfg.vehicle.final_thrust = 1.0e6;
        cfg.sim.horizon = Some(10.0);
        let traj = simulate(&cfg).unwrap();
        assert!(traj.last().unwrap().altitude() < cfg.vehicle.launch_altitude);
    }
}
