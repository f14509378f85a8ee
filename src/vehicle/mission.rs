use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dynamics::state::SimConfig;
use crate::errors::ConfigError;
use crate::guidance::params::GuidanceParams;
use crate::physics::{Atmosphere, Body};

use super::params::{PitchProgram, VehicleParams};

// ---------------------------------------------------------------------------
// Mission configuration: everything both halves need, fixed at start
// ---------------------------------------------------------------------------

/// Largest output grid a simulation may request.
pub const MAX_OUTPUT_POINTS: usize = 10_000_000;

/// One immutable parameter set shared by the trajectory simulator and the
/// ascent controller. Every section falls back to the preset when absent from
/// a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub name: String,
    pub body: Body,
    pub atmosphere: Atmosphere,
    pub vehicle: VehicleParams,
    pub pitch: PitchProgram,
    pub sim: SimConfig,
    pub guidance: GuidanceParams,
}

impl Default for MissionConfig {
    fn default() -> Self {
        presets::artemis_kerbin()
    }
}

impl MissionConfig {
    /// Parse from JSON and validate.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MissionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.vehicle;
        let positive = [
            ("body.gravitational_constant", self.body.gravitational_constant),
            ("body.mass", self.body.mass),
            ("body.radius", self.body.radius),
            ("atmosphere.gas_constant", self.atmosphere.gas_constant),
            ("atmosphere.temperature", self.atmosphere.temperature),
            ("vehicle.burn_time", v.burn_time),
            ("vehicle.initial_mass", v.initial_mass),
            ("sim.dt", self.sim.dt),
            ("sim.integrator.rtol", self.sim.integrator.rtol),
            ("sim.integrator.atol", self.sim.integrator.atol),
            ("sim.integrator.max_step", self.sim.integrator.max_step),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if !(v.propellant_mass >= 0.0) || v.propellant_mass >= v.initial_mass {
            return Err(ConfigError::ValidationError(format!(
                "propellant mass {} must be in [0, initial mass {})",
                v.propellant_mass, v.initial_mass
            )));
        }
        if let Some(h) = self.sim.horizon {
            if !(h >= 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "sim.horizon must be non-negative, got {}",
                    h
                )));
            }
        }
        let points = self.sim.horizon_for(v) / self.sim.dt;
        if !(points <= MAX_OUTPUT_POINTS as f64) {
            return Err(ConfigError::ValidationError(format!(
                "horizon / dt gives {:.3e} output points, more than {}",
                points, MAX_OUTPUT_POINTS
            )));
        }
        self.guidance.validate().map_err(ConfigError::ValidationError)
    }
}

// ---------------------------------------------------------------------------
// Preset missions
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Artemis-class launch from Kerbin to a 135 km periapsis orbit.
    pub fn artemis_kerbin() -> MissionConfig {
        MissionConfig {
            name: "Artemis-1 Launch".into(),
            body: Body::default(),
            atmosphere: Atmosphere::default(),
            vehicle: VehicleParams::default(),
            pitch: PitchProgram::default(),
            sim: SimConfig::default(),
            guidance: GuidanceParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_is_valid() {
        assert!(presets::artemis_kerbin().validate().is_ok());
    }

    #[test]
    fn partial_json_overrides_preset() {
        let cfg = MissionConfig::from_json_str(
            r#"{ "name": "Short hop", "vehicle": { "burn_time": 60.0 }, "sim": { "dt": 0.5 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.name, "Short hop");
        assert_eq!(cfg.vehicle.burn_time, 60.0);
        assert_eq!(cfg.vehicle.initial_mass, VehicleParams::default().initial_mass);
        assert_eq!(cfg.sim.dt, 0.5);
        assert_eq!(cfg.guidance, GuidanceParams::default());
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let cfg = presets::artemis_kerbin();
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(MissionConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn propellant_heavier_than_vehicle_rejected() {
        let mut cfg = presets::artemis_kerbin();
        cfg.vehicle.propellant_mass = cfg.vehicle.initial_mass;
        assert!(matches!(cfg.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn oversized_output_grid_rejected() {
        let mut cfg = presets::artemis_kerbin();
        cfg.sim.dt = 1e-12;
        assert!(matches!(cfg.validate(), Err(ConfigError::ValidationError(_))));
        cfg.sim.dt = 2.0 * cfg.vehicle.burn_time / MAX_OUTPUT_POINTS as f64;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = MissionConfig::from_json_str("{ \"vehicle\": 3 }").unwrap_err();
        assert!(matches!(err, ConfigError::JsonError(_)));
    }
}
