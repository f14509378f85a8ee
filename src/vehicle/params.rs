use serde::{Deserialize, Serialize};

use crate::physics::gravity::{gravitational_acceleration, Body};

// ---------------------------------------------------------------------------
// Vehicle definition (lumped multistage stack, single burn)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    pub initial_thrust: f64,   // N, at ignition
    pub final_thrust: f64,     // N, at burnout
    pub burn_time: f64,        // s
    pub drag_coefficient: f64, // dimensionless
    pub reference_area: f64,   // m^2
    pub initial_mass: f64,     // kg, wet mass at ignition
    pub propellant_mass: f64,  // kg, usable propellant
    pub launch_altitude: f64,  // m above the body's reference radius
}

impl Default for VehicleParams {
    /// Artemis-class stack on Kerbin.
    fn default() -> Self {
        Self {
            initial_thrust: 8_109_133.0,
            final_thrust: 10_631_500.0,
            burn_time: 135.0,
            drag_coefficient: 0.5,
            reference_area: std::f64::consts::PI * 4.2 * 4.2,
            initial_mass: 527_561.0,
            propellant_mass: 293_621.0,
            launch_altitude: 93.0,
        }
    }
}

impl VehicleParams {
    /// Propellant mass flow rate, kg/s (constant over the burn).
    pub fn mass_flow(&self) -> f64 {
        self.propellant_mass / self.burn_time
    }

    pub fn dry_mass(&self) -> f64 {
        self.initial_mass - self.propellant_mass
    }

    /// Closed-form mass at `elapsed` seconds, floored at the dry mass.
    pub fn mass_at(&self, elapsed: f64) -> f64 {
        (self.initial_mass - self.mass_flow() * elapsed.max(0.0)).max(self.dry_mass())
    }

    /// Thrust-to-weight ratio on the pad.
    pub fn liftoff_twr(&self, body: &Body) -> f64 {
        self.initial_thrust
            / (self.initial_mass * gravitational_acceleration(body, self.launch_altitude))
    }
}

// ---------------------------------------------------------------------------
// Pitch program
// ---------------------------------------------------------------------------

/// Open-loop linear pitch law: `phi(t) = initial + rate * t` (rad, from horizontal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchProgram {
    pub initial: f64, // rad
    pub rate: f64,    // rad/s
}

impl Default for PitchProgram {
    fn default() -> Self {
        Self {
            initial: std::f64::consts::FRAC_PI_2,
            rate: -0.0131,
        }
    }
}

impl PitchProgram {
    pub fn angle_at(&self, elapsed: f64) -> f64 {
        self.initial + self.rate * elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mass_flow_empties_tank_at_burnout() {
        let v = VehicleParams::default();
        assert!((v.mass_at(v.burn_time) - v.dry_mass()).abs() < 1e-6);
        assert!((v.mass_flow() * v.burn_time - v.propellant_mass).abs() < 1e-6);
    }

    #[test]
    fn mass_never_below_dry() {
        let v = VehicleParams::default();
        assert_eq!(v.mass_at(v.burn_time * 3.0), v.dry_mass());
        assert_eq!(v.mass_at(-5.0), v.initial_mass);
    }

    #[test]
    fn default_stack_can_lift_off() {
        let v = VehicleParams::default();
        let twr = v.liftoff_twr(&Body::default());
        assert!(twr > 1.5 && twr < 1.6, "TWR {}", twr);
    }

    #[test]
    fn pitch_program_is_linear_in_time() {
        let p = PitchProgram::default();
        assert_eq!(p.angle_at(0.0), std::f64::consts::FRAC_PI_2);
        assert!((p.angle_at(100.0) - (std::f64::consts::FRAC_PI_2 - 1.31)).abs() < 1e-12);
    }
}
