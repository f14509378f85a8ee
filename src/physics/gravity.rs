use serde::{Deserialize, Serialize};

/// Central body for point-mass gravity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    pub gravitational_constant: f64, // N·m^2/kg^2
    pub mass: f64,                   // kg
    pub radius: f64,                 // m
}

impl Default for Body {
    /// Kerbin.
    fn default() -> Self {
        Self {
            gravitational_constant: 6.674_30e-11,
            mass: 5.291_515_8e22,
            radius: 600_000.0,
        }
    }
}

impl Body {
    /// Standard gravitational parameter, m^3/s^2.
    pub fn mu(&self) -> f64 {
        self.gravitational_constant * self.mass
    }
}

/// Inverse-square gravitational acceleration magnitude at `altitude` above the
/// body's reference radius.
pub fn gravitational_acceleration(body: &Body, altitude: f64) -> f64 {
    let r = body.radius + altitude;
    body.mu() / (r * r)
}
