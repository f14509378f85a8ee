use nalgebra::{SVector, Vector2};
use serde::{Deserialize, Serialize};

use crate::sim::integrator::IntegratorOptions;
use crate::vehicle::VehicleParams;

/// ODE vector layout: `[x, y, vx, vy, mass]`.
pub type StateVector = SVector<f64, 5>;

// ---------------------------------------------------------------------------
// Point-mass state: position, velocity, mass
// ---------------------------------------------------------------------------

/// Simulated vehicle state. Planar frame: `pos.x` downrange, `pos.y` altitude
/// above the body's reference radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub time: f64,          // s since ignition
    pub pos: Vector2<f64>,  // m
    pub vel: Vector2<f64>,  // m/s
    pub mass: f64,          // kg
}

impl State {
    /// On the pad at ignition.
    pub fn initial(vehicle: &VehicleParams) -> Self {
        State {
            time: 0.0,
            pos: Vector2::new(0.0, vehicle.launch_altitude),
            vel: Vector2::zeros(),
            mass: vehicle.initial_mass,
        }
    }

    pub fn to_vector(&self) -> StateVector {
        StateVector::new(self.pos.x, self.pos.y, self.vel.x, self.vel.y, self.mass)
    }

    pub fn from_vector(time: f64, v: &StateVector) -> Self {
        State {
            time,
            pos: Vector2::new(v[0], v[1]),
            vel: Vector2::new(v[2], v[3]),
            mass: v[4],
        }
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    pub fn altitude(&self) -> f64 {
        self.pos.y
    }

    pub fn downrange(&self) -> f64 {
        self.pos.x
    }

    /// Angle of the velocity above the local horizontal (rad).
    pub fn flight_path_angle(&self) -> f64 {
        if self.speed() < 1e-9 {
            return std::f64::consts::FRAC_PI_2;
        }
        self.vel.y.atan2(self.vel.x)
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deriv {
    pub dpos: Vector2<f64>, // velocity
    pub dvel: Vector2<f64>, // acceleration
    pub dmass: f64,         // negative while burning
}

impl Deriv {
    pub fn to_vector(&self) -> StateVector {
        StateVector::new(self.dpos.x, self.dpos.y, self.dvel.x, self.dvel.y, self.dmass)
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Spacing of the output grid, s.
    pub dt: f64,
    /// Analysis horizon, s. Defaults to the burn duration.
    pub horizon: Option<f64>,
    pub integrator: IntegratorOptions,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            horizon: None,
            integrator: IntegratorOptions::default(),
        }
    }
}

impl SimConfig {
    pub fn horizon_for(&self, vehicle: &VehicleParams) -> f64 {
        self.horizon.unwrap_or(vehicle.burn_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_layout_round_trips() {
        let s = State {
            time: 4.0,
            pos: Vector2::new(1.0, 2.0),
            vel: Vector2::new(3.0, 4.0),
            mass: 5.0,
        };
        let v = s.to_vector();
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(State::from_vector(4.0, &v), s);
        assert_eq!(s.speed(), 5.0);
    }

    #[test]
    fn initial_state_on_pad() {
        let v = VehicleParams::default();
        let s = State::initial(&v);
        assert_eq!(s.to_vector().as_slice(), &[0.0, 93.0, 0.0, 0.0, v.initial_mass]);
        assert_eq!(s.flight_path_angle(), std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn horizon_defaults_to_burn_time() {
        let v = VehicleParams::default();
        assert_eq!(SimConfig::default().horizon_for(&v), v.burn_time);
        let cfg = SimConfig { horizon: Some(300.0), ..SimConfig::default() };
        assert_eq!(cfg.horizon_for(&v), 300.0);
    }
}
