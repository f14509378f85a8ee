use serde::{Deserialize, Serialize};

/// One recorded row per controller tick. SI units throughout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "Altitude")]
    pub altitude: f64,
    #[serde(rename = "Vertical Velocity")]
    pub vertical_velocity: f64,
    #[serde(rename = "Horizontal Velocity")]
    pub horizontal_velocity: f64,
    #[serde(rename = "Total Velocity")]
    pub total_speed: f64,
    #[serde(rename = "Drag")]
    pub drag: f64,
    /// Chord from the launch site to the current position projected onto the
    /// launch radius.
    #[serde(rename = "Displacement")]
    pub displacement: f64,
    #[serde(rename = "Engine Thrust")]
    pub engine_thrust: f64,
    #[serde(rename = "Vacuum Thrust")]
    pub vacuum_thrust: f64,
    /// Absent above the atmosphere or when the vehicle cannot report it.
    #[serde(rename = "Air Temperature")]
    pub air_temperature: Option<f64>,
}

/// Column names of the persisted telemetry, in order.
pub const HEADERS: [&str; 10] = [
    "Time",
    "Altitude",
    "Vertical Velocity",
    "Horizontal Velocity",
    "Total Velocity",
    "Drag",
    "Displacement",
    "Engine Thrust",
    "Vacuum Thrust",
    "Air Temperature",
];
