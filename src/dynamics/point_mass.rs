use nalgebra::Vector2;

use crate::dynamics::state::{Deriv, State, StateVector};
use crate::physics::{air_density, drag_magnitude, gravitational_acceleration, thrust_magnitude};
use crate::sim::integrator::OdeSystem;
use crate::vehicle::MissionConfig;

// ---------------------------------------------------------------------------
// Force composition (2D point mass, open-loop pitch program)
// ---------------------------------------------------------------------------

/// Forces acting on the vehicle at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceBreakdown {
    pub thrust: f64, // N
    pub drag: f64,   // N
    pub weight: f64, // N
    pub pitch: f64,  // rad from horizontal
    pub mass: f64,   // kg, closed-form
}

impl ForceBreakdown {
    pub fn at(config: &MissionConfig, state: &State) -> Self {
        let vehicle = &config.vehicle;
        let t = state.time;
        let mass = vehicle.mass_at(t);
        let density = air_density(&config.atmosphere, state.pos.y);
        ForceBreakdown {
            thrust: thrust_magnitude(vehicle, t),
            drag: drag_magnitude(vehicle, density, state.speed()),
            weight: gravitational_acceleration(&config.body, state.pos.y) * mass,
            pitch: config.pitch.angle_at(t),
            mass,
        }
    }

    /// Acceleration. Drag is a scalar sharing the thrust axis.
    pub fn acceleration(&self) -> Vector2<f64> {
        let axial = self.thrust - self.drag;
        Vector2::new(
            axial * self.pitch.cos() / self.mass,
            (axial * self.pitch.sin() - self.weight) / self.mass,
        )
    }
}

/// Compute state derivatives for `state` under `config`.
///
/// The mass carried in `state` is ignored: mass is a closed-form function of
/// time. The reported mass rate is `-mass_flow` while that closed form is above
/// the dry mass, zero afterwards.
pub fn derivatives(config: &MissionConfig, state: &State) -> Deriv {
    let forces = ForceBreakdown::at(config, state);
    let vehicle = &config.vehicle;

    let dmass = if forces.mass > vehicle.dry_mass() {
        -vehicle.mass_flow()
    } else {
        0.0
    };

    Deriv {
        dpos: state.vel,
        dvel: forces.acceleration(),
        dmass,
    }
}

/// The ascent equations of motion as an ODE system for the solver.
pub struct AscentDynamics<'a> {
    pub config: &'a MissionConfig,
}

impl OdeSystem for AscentDynamics<'_> {
    fn rhs(&self, t: f64, y: &StateVector) -> StateVector {
        derivatives(self.config, &State::from_vector(t, y)).to_vector()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::presets;

    #[test]
    fn net_upward_accel_on_pad() {
        let cfg = presets::artemis_kerbin();
        let state = State::initial(&cfg.vehicle);
        let d = derivatives(&cfg, &state);
        assert!(d.dvel.y > 0.0, "net accel should be upward, got {}", d.dvel.y);
        // Pitch 90 deg: thrust has no horizontal component.
        assert!(d.dvel.x.abs() < 1e-6);
        assert_eq!(d.dmass, -cfg.vehicle.mass_flow());
    }

    #[test]
    fn mass_component_of_state_is_overwritten() {
        let cfg = presets::artemis_kerbin();
        let mut a = State::initial(&cfg.vehicle);
        a.time = 30.0;
        let mut b = a;
        b.mass = 1.0;
        assert_eq!(derivatives(&cfg, &a), derivatives(&cfg, &b));
    }

    #[test]
    fn no_thrust_and_no_mass_flow_after_burnout() {
        let cfg = presets::artemis_kerbin();
        let state = State {
            time: cfg.vehicle.burn_time + 10.0,
            pos: Vector2::new(100_000.0, 45_000.0),
            vel: Vector2::new(2_000.0, 0.0),
            mass: cfg.vehicle.dry_mass(),
        };
        let f = ForceBreakdown::at(&cfg, &state);
        assert_eq!(f.thrust, 0.0);
        let d = derivatives(&cfg, &state);
        assert_eq!(d.dmass, 0.0);
        // Only the (scalar, thrust-axis) drag and gravity remain.
        assert!(d.dvel.y < 0.0);
    }

    #[test]
    fn drag_shares_thrust_projection() {
        let cfg = presets::artemis_kerbin();
        let state = State {
            time: 40.0,
            pos: Vector2::new(2_000.0, 5_000.0),
            vel: Vector2::new(150.0, 300.0),
            mass: 0.0,
        };
        let f = ForceBreakdown::at(&cfg, &state);
        assert!(f.drag > 0.0);
        let a = f.acceleration();
        let expected_x = (f.thrust - f.drag) * f.pitch.cos() / f.mass;
        let expected_y = ((f.thrust - f.drag) * f.pitch.sin() - f.weight) / f.mass;
        assert!((a.x - expected_x).abs() < 1e-12);
        assert!((a.y - expected_y).abs() < 1e-12);
    }
}
