use nalgebra::Vector3;

use crate::errors::LinkError;

/// One engine part on the vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineInfo {
    pub title: String,
    pub max_vacuum_thrust: f64, // N
}

/// Speeds relative to the rotating surface of the body (m/s).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceVelocity {
    pub vertical: f64,
    pub horizontal: f64,
    pub speed: f64,
}

/// Telemetry and control channel to a live (or replayed) vehicle.
///
/// Every call is synchronous. `LinkError::Disconnected` means the link is gone
/// for good; `LinkError::Unavailable` means this one reading has no value now.
pub trait VehicleLink {
    // --- telemetry ---

    /// Universal time on the vehicle's clock (s).
    fn mission_time(&mut self) -> Result<f64, LinkError>;
    /// Altitude above mean sea level (m).
    fn mean_altitude(&mut self) -> Result<f64, LinkError>;
    fn apoapsis(&mut self) -> Result<f64, LinkError>;
    fn periapsis(&mut self) -> Result<f64, LinkError>;
    fn time_to_apoapsis(&mut self) -> Result<f64, LinkError>;
    /// Remaining amount of a named resource across the whole vehicle.
    fn resource_amount(&mut self, name: &str) -> Result<f64, LinkError>;
    fn surface_velocity(&mut self) -> Result<SurfaceVelocity, LinkError>;
    /// Aerodynamic drag force vector (N).
    fn drag(&mut self) -> Result<Vector3<f64>, LinkError>;
    /// Position in the body-centred, body-fixed frame (m).
    fn position(&mut self) -> Result<Vector3<f64>, LinkError>;
    /// Static air temperature (K). Unavailable outside the atmosphere.
    fn air_temperature(&mut self) -> Result<f64, LinkError>;
    /// Current total engine thrust (N).
    fn thrust(&mut self) -> Result<f64, LinkError>;
    fn engines(&mut self) -> Result<Vec<EngineInfo>, LinkError>;

    // --- commands ---

    fn set_throttle(&mut self, throttle: f64) -> Result<(), LinkError>;
    fn engage_autopilot(&mut self) -> Result<(), LinkError>;
    fn set_pitch_heading(&mut self, pitch_deg: f64, heading_deg: f64) -> Result<(), LinkError>;
    fn set_roll(&mut self, roll_deg: f64) -> Result<(), LinkError>;
    fn activate_next_stage(&mut self) -> Result<(), LinkError>;
    /// Activate the engine whose title is exactly `title`.
    fn set_engine_active(&mut self, title: &str) -> Result<(), LinkError>;
}
