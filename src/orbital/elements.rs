use std::f64::consts::PI;

use nalgebra::Vector2;
use serde::Serialize;

use crate::dynamics::state::State;
use crate::physics::Body;

/// Planar two-body orbit through a point of the ascent, as the vehicle would
/// fly it with the engines off and no drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitSummary {
    pub sma: f64, // semi-major axis, m (negative when hyperbolic)
    pub ecc: f64,
    /// Altitude above the reference radius, m. Infinite for escape trajectories.
    pub apoapsis: f64,
    pub periapsis: f64,
    /// Seconds until apoapsis; `None` when the orbit is unbound or circular.
    pub time_to_apoapsis: Option<f64>,
}

impl OrbitSummary {
    /// From a body-centred position and velocity.
    pub fn from_state_vector(pos: &Vector2<f64>, vel: &Vector2<f64>, body: &Body) -> Self {
        let mu = body.mu();
        let r = pos.norm();
        let v = vel.norm();
        let rv = pos.dot(vel);

        // Eccentricity vector
        let e_vec = ((v * v - mu / r) * pos - rv * vel) / mu;
        let ecc = e_vec.norm();

        let energy = 0.5 * v * v - mu / r;
        let sma = -mu / (2.0 * energy);

        if energy >= 0.0 {
            let periapsis = if ecc > 1.0 { sma * (1.0 - ecc) } else { r };
            return OrbitSummary {
                sma,
                ecc,
                apoapsis: f64::INFINITY,
                periapsis: periapsis - body.radius,
                time_to_apoapsis: None,
            };
        }

        let time_to_apoapsis = if ecc > 1e-10 {
            let cos_e = ((1.0 - r / sma) / ecc).clamp(-1.0, 1.0);
            let ecc_anom = if rv >= 0.0 { cos_e.acos() } else { 2.0 * PI - cos_e.acos() };
            let mean_anom = ecc_anom - ecc * ecc_anom.sin();
            let n = (mu / sma.powi(3)).sqrt();
            let to_go = if mean_anom <= PI { PI - mean_anom } else { 3.0 * PI - mean_anom };
            Some(to_go / n)
        } else {
            None
        };

        OrbitSummary {
            sma,
            ecc,
            apoapsis: sma * (1.0 + ecc) - body.radius,
            periapsis: sma * (1.0 - ecc) - body.radius,
            time_to_apoapsis,
        }
    }

    /// From a simulated state. The local frame is placed at the top of the
    /// body: `pos.y` radial, `pos.x` ignored.
    pub fn from_state(state: &State, body: &Body) -> Self {
        let pos = Vector2::new(0.0, body.radius + state.altitude());
        Self::from_state_vector(&pos, &state.vel, body)
    }

    /// Orbital period for a bound orbit (s).
    pub fn period(&self, body: &Body) -> Option<f64> {
        (self.sma > 0.0).then(|| 2.0 * PI * (self.sma.powi(3) / body.mu()).sqrt())
    }

    pub fn is_bound(&self) -> bool {
        self.apoapsis.is_finite()
    }
}
