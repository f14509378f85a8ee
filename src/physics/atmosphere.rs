use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Isothermal exponential atmosphere
// ---------------------------------------------------------------------------

/// Constants of a single-layer isothermal atmosphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Atmosphere {
    pub sea_level_density: f64, // kg/m^3
    pub reference_gravity: f64, // m/s^2
    pub molar_mass: f64,        // kg/mol
    pub gas_constant: f64,      // J/(mol·K)
    pub temperature: f64,       // K
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            sea_level_density: 1.2255,
            reference_gravity: 9.81,
            molar_mass: 0.029,
            gas_constant: 8.310,
            temperature: 186.95,
        }
    }
}

impl Atmosphere {
    /// Altitude over which density falls by a factor of e.
    pub fn scale_height(&self) -> f64 {
        self.gas_constant * self.temperature / (self.reference_gravity * self.molar_mass)
    }
}

/// Air density at `altitude` (m). Negative altitudes are treated as sea level.
pub fn air_density(atm: &Atmosphere, altitude: f64) -> f64 {
    let h = altitude.max(0.0);
    atm.sea_level_density * (-h / atm.scale_height()).exp()
}
